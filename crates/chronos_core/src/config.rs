//! Engine configuration.
//!
//! # Responsibility
//! - Describe tunables for navigation, geometry, drafts and conflict
//!   detection, with defaults matching the calendar's shipped behavior.
//! - Load from JSON (string or file) and apply environment overrides.
//!
//! # Invariants
//! - Every field has a default; a partial JSON object is valid input.
//! - `validate()` runs after every load path, so a returned config is usable.

use crate::layout::conflict::ConflictStrategy;
use crate::layout::grid::WeekStart;
use crate::model::event::DEFAULT_EVENT_COLOR;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const PINNED_TODAY_ENV: &str = "CHRONOS_PINNED_TODAY";
pub const WEEK_START_ENV: &str = "CHRONOS_WEEK_START";

const DEFAULT_MIN_EXTENT_FRACTION: f64 = 1.0 / 64.0;
const DEFAULT_HOUR_UNIT: f64 = 64.0;
const DEFAULT_EVENT_MINUTES: i64 = 60;
const DEFAULT_UPCOMING_LIMIT: usize = 5;
const MAX_EVENT_MINUTES: i64 = 24 * 60;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    InvalidValue { field: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidValue { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Scheduling engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub week_start: WeekStart,
    /// Fixed reference date used instead of the system clock.
    pub pinned_today: Option<NaiveDate>,
    /// Presentation floor for timeline extents, as a fraction of a day.
    pub min_extent_fraction: f64,
    /// Units per hour for absolute timeline geometry.
    pub hour_unit: f64,
    pub default_event_minutes: i64,
    pub default_color: String,
    pub conflict_strategy: ConflictStrategy,
    pub upcoming_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            pinned_today: None,
            min_extent_fraction: DEFAULT_MIN_EXTENT_FRACTION,
            hour_unit: DEFAULT_HOUR_UNIT,
            default_event_minutes: DEFAULT_EVENT_MINUTES,
            default_color: DEFAULT_EVENT_COLOR.to_string(),
            conflict_strategy: ConflictStrategy::default(),
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_extent_fraction.is_finite()
            || self.min_extent_fraction < 0.0
            || self.min_extent_fraction > 1.0
        {
            return Err(ConfigError::InvalidValue {
                field: "min_extent_fraction",
                message: format!("expected 0.0..=1.0, got {}", self.min_extent_fraction),
            });
        }
        if !self.hour_unit.is_finite() || self.hour_unit <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "hour_unit",
                message: format!("expected a positive number, got {}", self.hour_unit),
            });
        }
        if self.default_event_minutes <= 0 || self.default_event_minutes > MAX_EVENT_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "default_event_minutes",
                message: format!(
                    "expected 1..={MAX_EVENT_MINUTES}, got {}",
                    self.default_event_minutes
                ),
            });
        }
        if self.default_color.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "default_color",
                message: "cannot be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Applies `CHRONOS_PINNED_TODAY` / `CHRONOS_WEEK_START` from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Blank values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = non_blank(lookup(PINNED_TODAY_ENV)) {
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|err| {
                ConfigError::InvalidValue {
                    field: "pinned_today",
                    message: format!("`{raw}` is not YYYY-MM-DD: {err}"),
                }
            })?;
            self.pinned_today = Some(date);
        }
        if let Some(raw) = non_blank(lookup(WEEK_START_ENV)) {
            self.week_start = WeekStart::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "week_start",
                message: format!("`{raw}` is not sunday|monday"),
            })?;
        }
        Ok(())
    }

    /// Reference "today": the pinned date, or the local system date.
    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Log bootstrap settings consumed by `crate::logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: String::new(),
            max_file_bytes: 10 * 1024 * 1024,
            max_files: 5,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig, PINNED_TODAY_ENV, WEEK_START_ENV};
    use crate::layout::grid::WeekStart;
    use chrono::NaiveDate;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"week_start": "monday"}"#).unwrap();
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.default_event_minutes, 60);
        assert!((config.min_extent_fraction - 1.0 / 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_negative_extent() {
        let error = EngineConfig::from_json_str(r#"{"min_extent_fraction": -0.5}"#).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                field: "min_extent_fraction",
                ..
            }
        ));
    }

    #[test]
    fn overrides_apply_pinned_today_and_week_start() {
        let mut config = EngineConfig::default();
        config
            .apply_overrides_from(|key| match key {
                PINNED_TODAY_ENV => Some("2025-06-24".to_string()),
                WEEK_START_ENV => Some(" Monday ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.pinned_today, NaiveDate::from_ymd_opt(2025, 6, 24));
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2025, 6, 24).unwrap());
    }

    #[test]
    fn malformed_override_is_reported() {
        let mut config = EngineConfig::default();
        let error = config
            .apply_overrides_from(|key| (key == PINNED_TODAY_ENV).then(|| "24/06/2025".to_string()))
            .unwrap_err();
        assert!(error.to_string().contains("pinned_today"));
    }
}
