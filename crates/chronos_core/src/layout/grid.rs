//! Month and year grid generation.
//!
//! # Invariants
//! - A month grid always has 6 weeks x 7 days = 42 cells, whatever the month
//!   length or the weekday it starts on.
//! - Cells run contiguously: leading days of the previous month, every day of
//!   the target month, then trailing days of the next month.
//! - Months are 1-based; anything outside `1..=12` is rejected.

use super::{LayoutError, LayoutResult};
use crate::model::event::Event;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_WEEKS: usize = 6;
pub const GRID_CELLS: usize = DAYS_PER_WEEK * GRID_WEEKS;
pub const MONTHS_PER_YEAR: u32 = 12;

/// First column of every week row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Column index of `day` (0 = first day of week).
    pub fn column_of(self, day: Weekday) -> u32 {
        match self {
            Self::Sunday => day.num_days_from_sunday(),
            Self::Monday => day.num_days_from_monday(),
        }
    }

    /// Short column headers in display order.
    pub fn labels(self) -> [&'static str; DAYS_PER_WEEK] {
        match self {
            Self::Sunday => ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"],
            Self::Monday => ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Some(Self::Sunday),
            "monday" | "mon" => Some(Self::Monday),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub date: NaiveDate,
    pub is_in_target_month: bool,
}

/// Fixed 6x7 day matrix for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: [[GridCell; DAYS_PER_WEEK]; GRID_WEEKS],
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    pub fn first_date(&self) -> NaiveDate {
        self.weeks[0][0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.weeks[GRID_WEEKS - 1][DAYS_PER_WEEK - 1].date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_date() && date <= self.last_date()
    }
}

/// One mini-month of a year grid with its event counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniMonth {
    pub grid: MonthGrid,
    /// Events whose `start` falls in this month.
    pub event_count: usize,
    /// Day-of-month -> event count, for density dots.
    pub events_by_day: BTreeMap<u32, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearGrid {
    pub year: i32,
    pub months: Vec<MiniMonth>,
}

/// First day of `(year, month)`, failing fast on an invalid pair.
pub fn first_of_month(year: i32, month: u32) -> LayoutResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(LayoutError::InvalidMonth { year, month })
}

pub fn days_in_month(year: i32, month: u32) -> LayoutResult<u32> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or(LayoutError::DateOutOfRange(first))?;
    let days = next.signed_duration_since(first).num_days();
    Ok(days as u32)
}

/// Builds the 42-cell grid for `(year, month)`.
pub fn month_grid(year: i32, month: u32, week_start: WeekStart) -> LayoutResult<MonthGrid> {
    let first = first_of_month(year, month)?;
    let leading = week_start.column_of(first.weekday());
    let grid_start = first
        .checked_sub_days(Days::new(u64::from(leading)))
        .ok_or(LayoutError::DateOutOfRange(first))?;

    let placeholder = GridCell {
        date: grid_start,
        is_in_target_month: false,
    };
    let mut weeks = [[placeholder; DAYS_PER_WEEK]; GRID_WEEKS];
    for index in 0..GRID_CELLS {
        let date = grid_start
            .checked_add_days(Days::new(index as u64))
            .ok_or(LayoutError::DateOutOfRange(grid_start))?;
        weeks[index / DAYS_PER_WEEK][index % DAYS_PER_WEEK] = GridCell {
            date,
            is_in_target_month: date.year() == year && date.month() == month,
        };
    }

    Ok(MonthGrid { year, month, weeks })
}

/// Builds twelve mini-months annotated with per-month and per-day counts.
pub fn year_grid(year: i32, week_start: WeekStart, events: &[Event]) -> LayoutResult<YearGrid> {
    let mut months = Vec::with_capacity(MONTHS_PER_YEAR as usize);
    for month in 1..=MONTHS_PER_YEAR {
        let grid = month_grid(year, month, week_start)?;
        let mut events_by_day = BTreeMap::new();
        let mut event_count = 0;
        for event in events {
            let day = event.start_date();
            if day.year() == year && day.month() == month {
                event_count += 1;
                *events_by_day.entry(day.day()).or_insert(0) += 1;
            }
        }
        months.push(MiniMonth {
            grid,
            event_count,
            events_by_day,
        });
    }
    Ok(YearGrid { year, months })
}

/// The seven dates of the week containing `anchor`.
pub fn week_days(
    anchor: NaiveDate,
    week_start: WeekStart,
) -> LayoutResult<[NaiveDate; DAYS_PER_WEEK]> {
    let offset = week_start.column_of(anchor.weekday());
    let first = anchor
        .checked_sub_days(Days::new(u64::from(offset)))
        .ok_or(LayoutError::DateOutOfRange(anchor))?;
    let mut days = [first; DAYS_PER_WEEK];
    for (index, slot) in days.iter_mut().enumerate() {
        *slot = first
            .checked_add_days(Days::new(index as u64))
            .ok_or(LayoutError::DateOutOfRange(first))?;
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, month_grid, week_days, WeekStart};
    use chrono::{Datelike, NaiveDate, Weekday};

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2025, 12).unwrap(), 31);
    }

    #[test]
    fn monday_start_shifts_leading_days() {
        // June 2025 starts on a Sunday: six leading days when weeks start Monday.
        let grid = month_grid(2025, 6, WeekStart::Monday).unwrap();
        assert_eq!(grid.first_date(), NaiveDate::from_ymd_opt(2025, 5, 26).unwrap());
        assert_eq!(grid.weeks[0][6].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert!(grid.weeks[0][6].is_in_target_month);
    }

    #[test]
    fn week_days_start_on_configured_weekday() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let sunday_week = week_days(anchor, WeekStart::Sunday).unwrap();
        assert_eq!(sunday_week[0].weekday(), Weekday::Sun);
        assert_eq!(sunday_week[0], NaiveDate::from_ymd_opt(2025, 6, 22).unwrap());
        let monday_week = week_days(anchor, WeekStart::Monday).unwrap();
        assert_eq!(monday_week[0], NaiveDate::from_ymd_opt(2025, 6, 23).unwrap());
        assert_eq!(monday_week[6], NaiveDate::from_ymd_opt(2025, 6, 29).unwrap());
    }
}
