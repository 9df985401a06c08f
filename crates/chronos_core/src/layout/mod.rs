//! Calendar layout algorithms.
//!
//! # Responsibility
//! - Annotate day-scoped event lists with overlap flags (`conflict`).
//! - Build fixed-shape month/year grids (`grid`).
//! - Map time-of-day intervals onto a 24-hour timeline (`geometry`).
//! - Format hour and time-range labels (`labels`).
//!
//! # Invariants
//! - Every function here is pure: no store access, no clock reads.
//! - Out-of-domain dates fail fast with `LayoutError`; nothing is clamped.

use crate::model::event::EventId;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod conflict;
pub mod geometry;
pub mod grid;
pub mod labels;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// `(year, month)` does not name a calendar month (month is 1-based).
    InvalidMonth { year: i32, month: u32 },
    /// Date arithmetic left the supported calendar range.
    DateOutOfRange(NaiveDate),
    /// Hour outside `0..24` for a timeline slot.
    InvalidHour(u32),
    /// Geometry requested for an interval that leaves the displayed day.
    SpansMultipleDays { id: EventId, day: NaiveDate },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => {
                write!(f, "invalid calendar month: year {year}, month {month} (expected 1-12)")
            }
            Self::DateOutOfRange(date) => write!(f, "date arithmetic out of range near {date}"),
            Self::InvalidHour(hour) => write!(f, "invalid hour slot {hour} (expected 0-23)"),
            Self::SpansMultipleDays { id, day } => write!(
                f,
                "event {id} does not fall within {day}; clip it to the day first"
            ),
        }
    }
}

impl Error for LayoutError {}
