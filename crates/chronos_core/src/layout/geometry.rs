//! 24-hour timeline geometry.
//!
//! # Invariants
//! - `offset = (start_hour + start_minute / 60) / 24`.
//! - `extent = max(duration_hours / 24, min_extent)`; the floor is
//!   presentation-only and never touches stored `end`.
//! - Intervals must sit inside one displayed day. An `end` at the next
//!   midnight is treated as hour 24; anything later is `SpansMultipleDays`.

use super::{LayoutError, LayoutResult};
use crate::model::event::Event;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

pub const HOURS_PER_DAY: u32 = 24;

/// Fraction-of-day placement on a 24-hour timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineGeometry {
    /// 0.0 (midnight) to 1.0 (next midnight).
    pub offset: f64,
    pub extent: f64,
}

/// Absolute placement for a fixed per-hour unit size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbsoluteGeometry {
    pub top: f64,
    pub height: f64,
}

impl TimelineGeometry {
    /// Converts to absolute units; both forms share the fraction computation.
    pub fn in_units(&self, unit_per_hour: f64) -> AbsoluteGeometry {
        let day_units = unit_per_hour * f64::from(HOURS_PER_DAY);
        AbsoluteGeometry {
            top: self.offset * day_units,
            height: self.extent * day_units,
        }
    }
}

/// Geometry of `event` on its own start day.
pub fn position(event: &Event, min_extent: f64) -> LayoutResult<TimelineGeometry> {
    position_in_day(event, event.start_date(), min_extent)
}

/// Geometry of `event` on `day`. The caller clips cross-midnight events first.
pub fn position_in_day(
    event: &Event,
    day: NaiveDate,
    min_extent: f64,
) -> LayoutResult<TimelineGeometry> {
    let spans = || LayoutError::SpansMultipleDays {
        id: event.id.clone(),
        day,
    };
    if event.start.date() != day {
        return Err(spans());
    }

    let start_hours = hours_of(event.start.time());
    let end_hours = if event.end.date() == day {
        hours_of(event.end.time())
    } else if is_next_midnight(event.end, day) {
        f64::from(HOURS_PER_DAY)
    } else {
        return Err(spans());
    };

    let duration = (end_hours - start_hours).max(0.0);
    Ok(TimelineGeometry {
        offset: start_hours / f64::from(HOURS_PER_DAY),
        extent: (duration / f64::from(HOURS_PER_DAY)).max(min_extent),
    })
}

/// Portion of `event` inside `day`, or `None` when they do not intersect.
/// The returned copy keeps the id; only `start`/`end` are clipped.
pub fn clip_to_day(event: &Event, day: NaiveDate) -> LayoutResult<Option<Event>> {
    let day_start = day.and_time(NaiveTime::MIN);
    let next_day = day
        .checked_add_days(Days::new(1))
        .ok_or(LayoutError::DateOutOfRange(day))?
        .and_time(NaiveTime::MIN);

    let touches_day = event.start < next_day && event.end > day_start;
    let starts_here = event.start.date() == day;
    if !touches_day && !starts_here {
        return Ok(None);
    }

    let mut clipped = event.clone();
    clipped.start = event.start.max(day_start);
    clipped.end = event.end.min(next_day).max(clipped.start);
    Ok(Some(clipped))
}

/// Instant at the top of `hour` on `day` (time-slot clicks).
pub fn slot_start(day: NaiveDate, hour: u32) -> LayoutResult<NaiveDateTime> {
    day.and_hms_opt(hour, 0, 0).ok_or(LayoutError::InvalidHour(hour))
}

fn hours_of(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

fn is_next_midnight(instant: NaiveDateTime, day: NaiveDate) -> bool {
    instant.time() == NaiveTime::MIN && day.succ_opt() == Some(instant.date())
}
