use chrono::NaiveDate;
use chronos_core::{ConfigError, ConflictStrategy, EngineConfig, WeekStart};
use std::fs;
use tempfile::tempdir;

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(
        &path,
        r#"{"week_start": "monday", "pinned_today": "2025-06-24", "conflict_strategy": "sweep"}"#,
    )
    .unwrap();

    let config = EngineConfig::from_json_file(&path).unwrap();
    assert_eq!(config.week_start, WeekStart::Monday);
    assert_eq!(config.pinned_today, NaiveDate::from_ymd_opt(2025, 6, 24));
    assert_eq!(config.conflict_strategy, ConflictStrategy::Sweep);
    assert_eq!(config.default_event_minutes, 60);
    assert_eq!(config.upcoming_limit, 5);
    assert!((config.min_extent_fraction - 1.0 / 64.0).abs() < 1e-12);
    assert_eq!(config.today(), NaiveDate::from_ymd_opt(2025, 6, 24).unwrap());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match EngineConfig::from_json_file(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        EngineConfig::from_json_str("{\"week_start\": "),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn out_of_range_values_are_rejected() {
    let cases = [
        (r#"{"min_extent_fraction": 1.5}"#, "min_extent_fraction"),
        (r#"{"hour_unit": 0}"#, "hour_unit"),
        (r#"{"default_event_minutes": 0}"#, "default_event_minutes"),
        (r#"{"default_color": "  "}"#, "default_color"),
    ];
    for (json, expected) in cases {
        match EngineConfig::from_json_str(json) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid `{expected}`, got {other:?}"),
        }
    }
}

#[test]
fn overrides_replace_file_values_and_reject_garbage() {
    let mut config = EngineConfig::from_json_str(r#"{"week_start": "monday"}"#).unwrap();
    config
        .apply_overrides_from(|key| match key {
            "CHRONOS_WEEK_START" => Some("Sunday".to_string()),
            "CHRONOS_PINNED_TODAY" => Some("  ".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(config.week_start, WeekStart::Sunday);
    assert_eq!(config.pinned_today, None);

    let err = config
        .apply_overrides_from(|key| {
            (key == "CHRONOS_PINNED_TODAY").then(|| "24/06/2025".to_string())
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "pinned_today",
            ..
        }
    ));
}
