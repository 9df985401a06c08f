use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use chronos_core::model::template::DraftIssue;
use chronos_core::{
    CalendarService, CalendarServiceError, DayClickOutcome, DayWeather, EngineConfig, Event,
    EventCategory, EventId, EventTemplate, InMemoryEventStore, LayoutClass, LayoutError,
    RawEvent, TemplateKind, ViewMode, WeatherTable,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, minute, 0).unwrap()
}

fn pinned_config() -> EngineConfig {
    EngineConfig {
        pinned_today: Some(date(24)),
        ..EngineConfig::default()
    }
}

fn seeded_service() -> CalendarService<InMemoryEventStore> {
    let mut holiday =
        Event::with_id(EventId::new("hol"), "Founders Day", at(20, 0, 0), at(20, 23, 59));
    holiday.category = EventCategory::Holiday;
    let store = InMemoryEventStore::from_events(vec![
        Event::with_id(EventId::new("1"), "Standup", at(24, 9, 0), at(24, 9, 30)),
        Event::with_id(EventId::new("2"), "Sync", at(24, 9, 15), at(24, 10, 0)),
        Event::with_id(EventId::new("3"), "Review", at(24, 10, 0), at(24, 10, 30)),
        holiday,
    ]);
    CalendarService::new(store, pinned_config())
}

#[test]
fn starts_in_month_view_on_pinned_today() {
    let service = seeded_service();
    let state = service.navigation();
    assert_eq!(state.view_mode, ViewMode::Month);
    assert_eq!(state.current_date, date(24));
    assert_eq!(state.selected_date, date(24));
    assert_eq!(service.current_date(), date(24));
}

#[test]
fn go_to_today_then_set_day_view_keeps_date() {
    let mut service = seeded_service();
    service.jump_to_date(date(2));
    service.go_to_today();
    let after_today = service.current_date();
    service.set_view_mode(ViewMode::Day);
    assert_eq!(service.current_date(), after_today);
    assert_eq!(after_today, date(24));
}

#[test]
fn day_events_are_annotated_per_query() {
    let service = seeded_service();
    let flags: Vec<(String, bool)> = service
        .events_for_day(date(24))
        .into_iter()
        .map(|item| (item.event.id.to_string(), item.has_conflict))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("1".to_string(), true),
            ("2".to_string(), true),
            ("3".to_string(), false),
        ]
    );
}

#[test]
fn template_opens_draft_without_inserting() {
    let mut service = seeded_service();
    let before = service.events().len();
    let draft = service.create_from_kind(TemplateKind::Reminder).unwrap();

    assert!(draft.is_new());
    assert_eq!(draft.event.title, "Reminder");
    assert_eq!(draft.event.duration(), Duration::minutes(30));
    assert_eq!(draft.event.start_date(), date(24));
    assert_eq!(draft.event.start.minute(), 0);
    assert_eq!(service.events().len(), before);
    assert!(service.pending_draft().is_some());

    assert!(service.discard_draft().is_some());
    assert!(service.pending_draft().is_none());
    assert_eq!(service.events().len(), before);
}

#[test]
fn custom_template_overrides_defaults() {
    let mut service = seeded_service();
    let template = EventTemplate {
        title: "Quarterly planning".to_string(),
        duration_minutes: Some(120),
        start: Some(at(26, 14, 0)),
        ..EventTemplate::default()
    };
    let draft = service.create_from_template(&template).unwrap();
    assert_eq!(draft.event.start, at(26, 14, 0));
    assert_eq!(draft.event.end, at(26, 16, 0));
    assert_eq!(draft.event.color, "#6366F1");
}

#[test]
fn oversized_template_duration_is_rejected_without_opening_a_draft() {
    let mut service = seeded_service();
    let template: EventTemplate =
        serde_json::from_str(r#"{"title": "Forever", "durationMinutes": 9223372036854775807}"#)
            .unwrap();

    match service.create_from_template(&template) {
        Err(CalendarServiceError::Draft(err)) => {
            assert!(err.has_issue(&DraftIssue::InvalidDuration(i64::MAX)));
        }
        other => panic!("expected duration issue, got {other:?}"),
    }
    assert!(service.pending_draft().is_none());
    assert!(service.create_from_kind(TemplateKind::Meeting).is_ok());
}

#[test]
fn save_draft_assigns_id_and_commits() {
    let mut service = seeded_service();
    let mut draft = service.create_at(at(27, 15, 0)).unwrap();
    draft.event.title = "  Design review ".to_string();
    draft.event.attendees = vec!["alex@example.com".to_string()];

    let saved = service.save_draft(draft).unwrap();
    assert!(!saved.id.is_blank());
    assert_eq!(saved.title, "Design review");
    assert_eq!(saved.end, at(27, 16, 0));
    assert_eq!(service.get_event(&saved.id), Some(saved.clone()));
    assert!(service.pending_draft().is_none());
}

#[test]
fn save_draft_reports_field_issues() {
    let mut service = seeded_service();
    let mut draft = service.create_at(at(27, 15, 0)).unwrap();
    draft.event.end = at(27, 14, 0);
    draft.event.attendees = vec!["not-an-email".to_string()];

    match service.save_draft(draft) {
        Err(CalendarServiceError::Draft(err)) => {
            assert!(err.has_issue(&DraftIssue::MissingTitle));
            assert!(err.has_issue(&DraftIssue::InvalidRange));
            assert!(err.has_issue(&DraftIssue::InvalidAttendee("not-an-email".to_string())));
        }
        other => panic!("expected draft validation error, got {other:?}"),
    }
}

#[test]
fn edit_draft_of_deleted_event_is_not_found() {
    let mut service = seeded_service();
    let mut draft = service.open_event(&EventId::new("3")).unwrap();
    draft.event.title = "Review (renamed)".to_string();
    service.delete_event(&EventId::new("3"));

    assert_eq!(
        service.save_draft(draft),
        Err(CalendarServiceError::EventNotFound(EventId::new("3")))
    );
}

#[test]
fn edit_draft_updates_in_place() {
    let mut service = seeded_service();
    let mut draft = service.open_event(&EventId::new("3")).unwrap();
    assert!(!draft.is_new());
    draft.event.end = at(24, 11, 0);
    let saved = service.save_draft(draft).unwrap();
    assert_eq!(saved.id, EventId::new("3"));
    assert_eq!(service.get_event(&EventId::new("3")).unwrap().end, at(24, 11, 0));
}

#[test]
fn draft_conflicts_ignore_own_id_and_leave() {
    let service = seeded_service();
    let mut draft = service_draft_over(&service, "2");
    draft.event.start = at(24, 9, 45);
    draft.event.end = at(24, 10, 15);
    let ids: Vec<String> = service
        .draft_conflicts(&draft)
        .iter()
        .map(|event| event.id.to_string())
        .collect();
    assert_eq!(ids, vec!["3"]);
}

fn service_draft_over(
    service: &CalendarService<InMemoryEventStore>,
    id: &str,
) -> chronos_core::EventDraft {
    chronos_core::EventDraft::from_event(service.get_event(&EventId::new(id)).unwrap())
}

#[test]
fn move_event_keeps_time_and_duration() {
    let mut service = seeded_service();
    let moved = service.move_event(&EventId::new("2"), date(26)).unwrap();
    assert_eq!(moved.start, at(26, 9, 15));
    assert_eq!(moved.end, at(26, 10, 0));
    let remaining: Vec<bool> = service
        .events_for_day(date(24))
        .iter()
        .map(|item| item.has_conflict)
        .collect();
    assert_eq!(remaining, vec![false, false]);
}

#[test]
fn moving_onto_a_same_titled_event_keeps_both_records() {
    let store = InMemoryEventStore::from_events(vec![
        Event::with_id(EventId::new("mon"), "Standup", at(23, 9, 0), at(23, 9, 15)),
        Event::with_id(EventId::new("tue"), "Standup", at(24, 9, 0), at(24, 9, 15)),
    ]);
    let mut service = CalendarService::new(store, pinned_config());

    service.move_event(&EventId::new("mon"), date(24)).unwrap();
    assert_eq!(service.events_for_day(date(24)).len(), 1);
    service.move_event(&EventId::new("mon"), date(25)).unwrap();

    let ids: Vec<String> = service
        .events()
        .iter()
        .map(|event| event.id.to_string())
        .collect();
    assert_eq!(ids, vec!["tue", "mon"]);
    assert!(service.get_event(&EventId::new("tue")).is_some());
}

#[test]
fn move_past_the_last_representable_day_fails_cleanly() {
    let mut service = seeded_service();
    let mut late = service.create_at(at(24, 22, 0)).unwrap();
    late.event.title = "Night shift".to_string();
    late.event.end = at(25, 6, 0);
    let saved = service.save_draft(late).unwrap();

    assert_eq!(
        service.move_event(&saved.id, NaiveDate::MAX),
        Err(CalendarServiceError::Layout(LayoutError::DateOutOfRange(NaiveDate::MAX)))
    );
    assert_eq!(service.get_event(&saved.id).unwrap().start, at(24, 22, 0));
}

#[test]
fn move_event_refuses_leave_and_unknown() {
    let mut service = seeded_service();
    assert_eq!(
        service.move_event(&EventId::new("hol"), date(21)),
        Err(CalendarServiceError::LeaveEventLocked(EventId::new("hol")))
    );
    assert_eq!(
        service.move_event(&EventId::new("missing"), date(21)),
        Err(CalendarServiceError::EventNotFound(EventId::new("missing")))
    );
}

#[test]
fn click_day_previews_busy_days_on_compact_layout() {
    let mut service = seeded_service();
    assert_eq!(
        service.click_day(date(24), LayoutClass::Compact),
        DayClickOutcome::ListPreview
    );
    assert_eq!(service.navigation().view_mode, ViewMode::Month);

    assert_eq!(
        service.click_day(date(25), LayoutClass::Compact),
        DayClickOutcome::DrilledIn
    );
    let state = service.navigation();
    assert_eq!(state.view_mode, ViewMode::Day);
    assert_eq!(state.current_date, date(25));
}

#[test]
fn time_slot_click_opens_hour_long_draft() {
    let mut service = seeded_service();
    let draft = service.click_time_slot(date(28), 14).unwrap();
    assert_eq!(draft.event.start, at(28, 14, 0));
    assert_eq!(draft.event.end, at(28, 15, 0));
    assert_eq!(service.navigation().selected_date, date(28));
    assert!(service.click_time_slot(date(28), 24).is_err());
}

#[test]
fn upcoming_uses_configured_limit_from_today() {
    let mut service = seeded_service();
    for day in 25..=30 {
        let mut draft = service.create_at(at(day, 8, 0)).unwrap();
        draft.event.title = format!("Daily {day}");
        service.save_draft(draft).unwrap();
    }
    let upcoming = service.upcoming(None);
    assert_eq!(upcoming.len(), 5);
    assert_eq!(upcoming[0].id, EventId::new("1"));
    assert!(upcoming.iter().all(|event| event.start_date() >= date(24)));
    assert_eq!(service.upcoming(Some(2)).len(), 2);
}

#[test]
fn leave_days_and_event_dots() {
    let service = seeded_service();
    assert!(service.is_leave_day(date(20)));
    assert!(!service.is_leave_day(date(24)));
    assert!(service.day_has_events(date(24)));
    assert!(!service.day_has_events(date(23)));
}

#[test]
fn load_events_from_host_json() {
    let mut service = CalendarService::new(InMemoryEventStore::new(), pinned_config());
    let records = RawEvent::list_from_json(
        r#"[
            {"id": 1, "title": "Standup", "start": "2025-06-24T09:00:00", "end": "2025-06-24T09:30:00"},
            {"id": "1", "title": "Standup", "start": "2025-06-24T09:00:00", "end": "2025-06-24T09:30:00"}
        ]"#,
    )
    .unwrap();
    let report = service.load_events(records);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(service.events().len(), 1);
}

#[test]
fn views_follow_navigation_state() {
    let mut weather = WeatherTable::new();
    weather.insert(
        date(24),
        DayWeather {
            temp: 35,
            condition: "hot".to_string(),
            humidity: "high".to_string(),
        },
    );
    let mut service = seeded_service();
    service.set_weather(weather);

    let month = service.month_view().unwrap();
    assert_eq!((month.year, month.month), (2025, 6));
    assert_eq!(month.weeks.iter().map(Vec::len).sum::<usize>(), 42);
    let holiday_cell = month
        .weeks
        .iter()
        .flatten()
        .find(|cell| cell.date == date(20))
        .unwrap();
    assert!(holiday_cell.is_leave_day);

    service.set_view_mode(ViewMode::Week);
    let week = service.week_view().unwrap();
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[0].date, date(22));
    let today = week.days.iter().find(|day| day.is_today).unwrap();
    assert_eq!(today.blocks.len(), 3);
    assert_eq!(today.weather.as_ref().map(|w| w.condition.as_str()), Some("hot"));
    assert_eq!(today.blocks[0].time_label, "9:00a - 9:30a");

    service.set_view_mode(ViewMode::Day);
    let day = service.day_view().unwrap();
    assert_eq!(day.day.date, date(24));
    assert!(day.day.blocks[0].event.has_conflict);
    assert!((day.day.blocks[0].absolute.top - 576.0).abs() < 1e-9);

    let year = service.year_view().unwrap();
    assert_eq!(year.months.len(), 12);
    assert_eq!(year.months[5].event_count, 4);
}

#[test]
fn pinned_config_from_env_style_overrides() {
    let mut config = EngineConfig::default();
    config
        .apply_overrides_from(|key| {
            (key == "CHRONOS_PINNED_TODAY").then(|| "2025-06-24".to_string())
        })
        .unwrap();
    let service = CalendarService::new(InMemoryEventStore::new(), config);
    assert_eq!(service.today(), date(24));
}
