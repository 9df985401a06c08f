//! Navigation state shared between the engine and the host shell.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Active calendar projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Year,
    #[default]
    Month,
    Week,
    Day,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }

    pub fn parse(value: &str) -> Result<Self, UnknownViewMode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            other => Err(UnknownViewMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownViewMode(pub String);

impl Display for UnknownViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown view mode `{}`; expected year|month|week|day",
            self.0
        )
    }
}

impl Error for UnknownViewMode {}

/// Host layout class. Breakpoint logic stays in the host; the engine only
/// needs to know which click rule applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutClass {
    Compact,
    #[default]
    Regular,
}

/// Navigation snapshot: `{view_mode, current_date, selected_date}`.
///
/// `current_date` anchors the active view; `selected_date` is the last date the
/// user explicitly picked and moves independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub view_mode: ViewMode,
    pub current_date: NaiveDate,
    pub selected_date: NaiveDate,
}

impl NavigationState {
    /// Month view anchored and selected on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view_mode: ViewMode::default(),
            current_date: today,
            selected_date: today,
        }
    }
}
