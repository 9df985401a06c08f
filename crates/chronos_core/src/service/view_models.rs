//! Render-ready projections for the four calendar views.
//!
//! # Responsibility
//! - Join grid/timeline layout with day-scoped, conflict-annotated events.
//! - Attach today/selected/weekend/leave flags and host weather.
//!
//! # Invariants
//! - Builders are pure over their inputs; they never touch the store.
//! - Events are listed under the day their `start` falls on.
//! - Conflict flags are computed per day, fresh on every build.

use crate::config::EngineConfig;
use crate::layout::conflict::{annotate_with, AnnotatedEvent};
use crate::layout::geometry::{
    clip_to_day, position_in_day, AbsoluteGeometry, TimelineGeometry, HOURS_PER_DAY,
};
use crate::layout::grid::{month_grid, week_days, year_grid, MiniMonth, DAYS_PER_WEEK};
use crate::layout::labels::{format_hour, format_time_range, TimeLabelStyle};
use crate::layout::LayoutResult;
use crate::model::event::Event;
use crate::weather::{DayWeather, WeatherLookup};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Inputs shared by every view builder.
pub struct ViewContext<'a> {
    pub today: NaiveDate,
    pub selected: NaiveDate,
    pub config: &'a EngineConfig,
    pub weather: &'a dyn WeatherLookup,
}

impl ViewContext<'_> {
    fn annotate_day(&self, events: &[Event], day: NaiveDate) -> Vec<AnnotatedEvent> {
        let day_events: Vec<Event> = events
            .iter()
            .filter(|event| event.starts_on(day))
            .cloned()
            .collect();
        annotate_with(&day_events, self.config.conflict_strategy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
    pub date: NaiveDate,
    pub is_in_target_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_weekend: bool,
    pub is_leave_day: bool,
    pub weather: Option<DayWeather>,
    pub events: Vec<AnnotatedEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weekday_labels: Vec<&'static str>,
    /// Always 6 rows of 7 cells.
    pub weeks: Vec<Vec<MonthCell>>,
}

/// One positioned event on a 24-hour timeline column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBlock {
    pub event: AnnotatedEvent,
    pub is_leave: bool,
    pub geometry: TimelineGeometry,
    pub absolute: AbsoluteGeometry,
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_leave_day: bool,
    pub weather: Option<DayWeather>,
    pub blocks: Vec<TimelineBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub hour_labels: Vec<String>,
    pub days: Vec<DayColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub hour_labels: Vec<String>,
    pub day: DayColumn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearView {
    pub year: i32,
    pub today: NaiveDate,
    pub weekday_labels: Vec<&'static str>,
    pub months: Vec<MiniMonth>,
}

pub fn build_month_view(
    ctx: &ViewContext<'_>,
    year: i32,
    month: u32,
    events: &[Event],
) -> LayoutResult<MonthView> {
    let grid = month_grid(year, month, ctx.config.week_start)?;
    let weeks = grid
        .weeks
        .iter()
        .map(|week| {
            week.iter()
                .map(|cell| {
                    let annotated = ctx.annotate_day(events, cell.date);
                    MonthCell {
                        date: cell.date,
                        is_in_target_month: cell.is_in_target_month,
                        is_today: cell.date == ctx.today,
                        is_selected: cell.date == ctx.selected,
                        is_weekend: is_weekend(cell.date),
                        is_leave_day: annotated.iter().any(|item| item.event.is_leave()),
                        weather: ctx.weather.weather_on(cell.date),
                        events: annotated,
                    }
                })
                .collect()
        })
        .collect();

    Ok(MonthView {
        year,
        month,
        weekday_labels: ctx.config.week_start.labels().to_vec(),
        weeks,
    })
}

/// Week containing `anchor`, one timeline column per day.
pub fn build_week_view(
    ctx: &ViewContext<'_>,
    anchor: NaiveDate,
    events: &[Event],
) -> LayoutResult<WeekView> {
    let dates = week_days(anchor, ctx.config.week_start)?;
    let mut days = Vec::with_capacity(DAYS_PER_WEEK);
    for date in dates {
        days.push(build_column(ctx, date, events, TimeLabelStyle::Compact)?);
    }
    Ok(WeekView {
        hour_labels: hour_labels(),
        days,
    })
}

pub fn build_day_view(
    ctx: &ViewContext<'_>,
    date: NaiveDate,
    events: &[Event],
) -> LayoutResult<DayView> {
    Ok(DayView {
        hour_labels: hour_labels(),
        day: build_column(ctx, date, events, TimeLabelStyle::Long)?,
    })
}

pub fn build_year_view(
    ctx: &ViewContext<'_>,
    year: i32,
    events: &[Event],
) -> LayoutResult<YearView> {
    let grid = year_grid(year, ctx.config.week_start, events)?;
    Ok(YearView {
        year,
        today: ctx.today,
        weekday_labels: ctx.config.week_start.labels().to_vec(),
        months: grid.months,
    })
}

fn build_column(
    ctx: &ViewContext<'_>,
    date: NaiveDate,
    events: &[Event],
    style: TimeLabelStyle,
) -> LayoutResult<DayColumn> {
    let annotated = ctx.annotate_day(events, date);
    let mut blocks = Vec::with_capacity(annotated.len());
    for item in annotated {
        let Some(clipped) = clip_to_day(&item.event, date)? else {
            continue;
        };
        let geometry = position_in_day(&clipped, date, ctx.config.min_extent_fraction)?;
        blocks.push(TimelineBlock {
            is_leave: item.event.is_leave(),
            absolute: geometry.in_units(ctx.config.hour_unit),
            time_label: format_time_range(item.event.start, item.event.end, style),
            geometry,
            event: item,
        });
    }

    Ok(DayColumn {
        date,
        is_today: date == ctx.today,
        is_selected: date == ctx.selected,
        is_leave_day: blocks.iter().any(|block| block.is_leave),
        weather: ctx.weather.weather_on(date),
        blocks,
    })
}

fn hour_labels() -> Vec<String> {
    (0..HOURS_PER_DAY).map(format_hour).collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
