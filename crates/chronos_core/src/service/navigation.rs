//! Navigation state machine over `{view_mode, current_date, selected_date}`.
//!
//! # Invariants
//! - There is no terminal state; every command leaves a valid state behind.
//! - `set_view_mode` never moves `current_date`.
//! - Month/year steps keep the day-of-month, clamped to the target month's
//!   length (`2025-01-31` + 1 month = `2025-02-28`).
//! - A failed step leaves the state untouched.

use crate::model::navigation::{LayoutClass, NavigationState, ViewMode};
use chrono::{Days, Months, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Stepping from `from` in `mode` leaves chrono's supported date range.
    DateOutOfRange { from: NaiveDate, mode: ViewMode },
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateOutOfRange { from, mode } => write!(
                f,
                "cannot step {} view from {from}: date out of range",
                mode.as_str()
            ),
        }
    }
}

impl Error for NavigationError {}

/// What a day-cell click did to the navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClickOutcome {
    /// Month view switched to day view anchored on the clicked date.
    DrilledIn,
    /// The host should show the day's event list; view mode is unchanged.
    ListPreview,
    /// Only `selected_date` moved.
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct NavigationMachine {
    state: NavigationState,
}

impl NavigationMachine {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: NavigationState::new(today),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.view_mode
    }

    pub fn current_date(&self) -> NaiveDate {
        self.state.current_date
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.selected_date
    }

    /// Advances `current_date` by one unit of the active view.
    pub fn next(&mut self) -> Result<NaiveDate, NavigationError> {
        self.step(Direction::Forward)
    }

    pub fn previous(&mut self) -> Result<NaiveDate, NavigationError> {
        self.step(Direction::Backward)
    }

    /// Anchors and selects `today`; view mode is kept.
    pub fn go_to(&mut self, today: NaiveDate) {
        self.state.current_date = today;
        self.state.selected_date = today;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
    }

    /// Re-anchors the active view without changing mode or selection.
    pub fn jump_to_date(&mut self, date: NaiveDate) {
        self.state.current_date = date;
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.state.selected_date = date;
    }

    /// Applies the day-cell click rule.
    ///
    /// The date is always selected. A compact layout previews days that have
    /// events; otherwise a click in month view drills into day view.
    pub fn click_day(
        &mut self,
        date: NaiveDate,
        has_events: bool,
        layout: LayoutClass,
    ) -> DayClickOutcome {
        self.state.selected_date = date;
        if has_events && layout == LayoutClass::Compact {
            return DayClickOutcome::ListPreview;
        }
        if self.state.view_mode == ViewMode::Month {
            self.state.current_date = date;
            self.state.view_mode = ViewMode::Day;
            return DayClickOutcome::DrilledIn;
        }
        DayClickOutcome::Selected
    }

    /// Year-view mini-month header click.
    pub fn open_month(&mut self, date: NaiveDate) {
        self.state.current_date = date;
        self.state.view_mode = ViewMode::Month;
    }

    /// Year-view day click.
    pub fn open_day(&mut self, date: NaiveDate) {
        self.state.current_date = date;
        self.state.selected_date = date;
        self.state.view_mode = ViewMode::Day;
    }

    fn step(&mut self, direction: Direction) -> Result<NaiveDate, NavigationError> {
        let from = self.state.current_date;
        let mode = self.state.view_mode;
        let target = match (mode, direction) {
            (ViewMode::Day, Direction::Forward) => from.checked_add_days(Days::new(1)),
            (ViewMode::Day, Direction::Backward) => from.checked_sub_days(Days::new(1)),
            (ViewMode::Week, Direction::Forward) => from.checked_add_days(Days::new(7)),
            (ViewMode::Week, Direction::Backward) => from.checked_sub_days(Days::new(7)),
            (ViewMode::Month, Direction::Forward) => from.checked_add_months(Months::new(1)),
            (ViewMode::Month, Direction::Backward) => from.checked_sub_months(Months::new(1)),
            (ViewMode::Year, Direction::Forward) => from.checked_add_months(Months::new(12)),
            (ViewMode::Year, Direction::Backward) => from.checked_sub_months(Months::new(12)),
        }
        .ok_or(NavigationError::DateOutOfRange { from, mode })?;

        self.state.current_date = target;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::{DayClickOutcome, NavigationMachine};
    use crate::model::navigation::{LayoutClass, ViewMode};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn leap_day_year_step_clamps() {
        let mut machine = NavigationMachine::new(date(2024, 2, 29));
        machine.set_view_mode(ViewMode::Year);
        assert_eq!(machine.next().unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn week_and_day_steps() {
        let mut machine = NavigationMachine::new(date(2025, 6, 24));
        machine.set_view_mode(ViewMode::Week);
        assert_eq!(machine.previous().unwrap(), date(2025, 6, 17));
        machine.set_view_mode(ViewMode::Day);
        assert_eq!(machine.next().unwrap(), date(2025, 6, 18));
    }

    #[test]
    fn compact_click_on_busy_day_previews_without_leaving_month() {
        let mut machine = NavigationMachine::new(date(2025, 6, 24));
        let outcome = machine.click_day(date(2025, 6, 10), true, LayoutClass::Compact);
        assert_eq!(outcome, DayClickOutcome::ListPreview);
        assert_eq!(machine.view_mode(), ViewMode::Month);
        assert_eq!(machine.current_date(), date(2025, 6, 24));
        assert_eq!(machine.selected_date(), date(2025, 6, 10));
    }

    #[test]
    fn click_outside_month_view_only_selects() {
        let mut machine = NavigationMachine::new(date(2025, 6, 24));
        machine.set_view_mode(ViewMode::Week);
        let outcome = machine.click_day(date(2025, 6, 25), false, LayoutClass::Regular);
        assert_eq!(outcome, DayClickOutcome::Selected);
        assert_eq!(machine.view_mode(), ViewMode::Week);
        assert_eq!(machine.current_date(), date(2025, 6, 24));
    }
}
