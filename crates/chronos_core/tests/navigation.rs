use chrono::NaiveDate;
use chronos_core::{DayClickOutcome, LayoutClass, NavigationMachine, ViewMode};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn month_next_clamps_end_of_month() {
    let mut machine = NavigationMachine::new(date(2025, 1, 31));
    assert_eq!(machine.view_mode(), ViewMode::Month);
    assert_eq!(machine.next().unwrap(), date(2025, 2, 28));
    assert_eq!(machine.current_date(), date(2025, 2, 28));
}

#[test]
fn month_previous_clamps_too() {
    let mut machine = NavigationMachine::new(date(2025, 3, 31));
    assert_eq!(machine.previous().unwrap(), date(2025, 2, 28));
}

#[test]
fn step_sizes_per_view_mode() {
    let start = date(2025, 6, 24);
    let cases = [
        (ViewMode::Day, date(2025, 6, 25), date(2025, 6, 23)),
        (ViewMode::Week, date(2025, 7, 1), date(2025, 6, 17)),
        (ViewMode::Month, date(2025, 7, 24), date(2025, 5, 24)),
        (ViewMode::Year, date(2026, 6, 24), date(2024, 6, 24)),
    ];
    for (mode, forward, backward) in cases {
        let mut machine = NavigationMachine::new(start);
        machine.set_view_mode(mode);
        assert_eq!(machine.next().unwrap(), forward);
        machine.jump_to_date(start);
        assert_eq!(machine.previous().unwrap(), backward);
    }
}

#[test]
fn go_to_today_then_day_view_keeps_current_date() {
    let mut machine = NavigationMachine::new(date(2025, 1, 1));
    machine.jump_to_date(date(2025, 9, 9));
    machine.go_to(date(2025, 6, 24));
    let anchored = machine.current_date();
    machine.set_view_mode(ViewMode::Day);
    assert_eq!(machine.current_date(), anchored);
    assert_eq!(anchored, date(2025, 6, 24));
    assert_eq!(machine.selected_date(), date(2025, 6, 24));
}

#[test]
fn jump_to_date_keeps_view_mode_and_selection() {
    let mut machine = NavigationMachine::new(date(2025, 6, 24));
    machine.jump_to_date(date(2025, 12, 1));
    assert_eq!(machine.view_mode(), ViewMode::Month);
    assert_eq!(machine.current_date(), date(2025, 12, 1));
    assert_eq!(machine.selected_date(), date(2025, 6, 24));
}

#[test]
fn month_click_drills_into_day_view() {
    for (has_events, layout) in [
        (false, LayoutClass::Regular),
        (true, LayoutClass::Regular),
        (false, LayoutClass::Compact),
    ] {
        let mut machine = NavigationMachine::new(date(2025, 6, 24));
        let outcome = machine.click_day(date(2025, 6, 3), has_events, layout);
        assert_eq!(outcome, DayClickOutcome::DrilledIn);
        assert_eq!(machine.view_mode(), ViewMode::Day);
        assert_eq!(machine.current_date(), date(2025, 6, 3));
        assert_eq!(machine.selected_date(), date(2025, 6, 3));
    }
}

#[test]
fn year_view_clicks_open_month_and_day() {
    let mut machine = NavigationMachine::new(date(2025, 6, 24));
    machine.set_view_mode(ViewMode::Year);
    machine.open_month(date(2025, 10, 1));
    assert_eq!(machine.view_mode(), ViewMode::Month);
    assert_eq!(machine.current_date(), date(2025, 10, 1));
    assert_eq!(machine.selected_date(), date(2025, 6, 24));

    machine.set_view_mode(ViewMode::Year);
    machine.open_day(date(2025, 11, 5));
    assert_eq!(machine.view_mode(), ViewMode::Day);
    assert_eq!(machine.current_date(), date(2025, 11, 5));
    assert_eq!(machine.selected_date(), date(2025, 11, 5));
}

#[test]
fn failed_step_leaves_state_untouched() {
    let mut machine = NavigationMachine::new(NaiveDate::MAX);
    machine.set_view_mode(ViewMode::Day);
    assert!(machine.next().is_err());
    assert_eq!(machine.current_date(), NaiveDate::MAX);
}
