//! Hour and time-range labels for timeline views.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLabelStyle {
    /// `9:00a - 9:30a`, used in narrow week columns.
    Compact,
    /// `9:00 AM - 9:30 AM`.
    #[default]
    Long,
}

/// Hour gutter label: `12 AM`, `1 AM`, ..., `12 PM`, `1 PM`, ...
pub fn format_hour(hour: u32) -> String {
    let (display, meridiem) = twelve_hour(hour % 24);
    format!("{display} {meridiem}")
}

pub fn format_time(instant: NaiveDateTime, style: TimeLabelStyle) -> String {
    let (display, meridiem) = twelve_hour(instant.hour());
    let minute = instant.minute();
    match style {
        TimeLabelStyle::Compact => {
            let suffix = if meridiem == "AM" { "a" } else { "p" };
            format!("{display}:{minute:02}{suffix}")
        }
        TimeLabelStyle::Long => format!("{display}:{minute:02} {meridiem}"),
    }
}

pub fn format_time_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    style: TimeLabelStyle,
) -> String {
    format!("{} - {}", format_time(start, style), format_time(end, style))
}

fn twelve_hour(hour: u32) -> (u32, &'static str) {
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        other => other,
    };
    (display, meridiem)
}
