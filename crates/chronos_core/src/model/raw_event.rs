//! Host record ingestion.
//!
//! # Responsibility
//! - Accept loosely shaped host event records (camelCase JSON).
//! - Apply optional-field defaults once, so consumers never re-default.
//!
//! # Invariants
//! - Ingestion never swaps or corrects `start`/`end`; pre-existing reversed
//!   ranges pass through unchanged and are reported by the store.
//! - Blank or missing ids are replaced with generated ones.

use crate::model::event::{
    normalize_labels, Event, EventCategory, EventId, Priority, RecurrencePattern, Reminder,
    DEFAULT_EVENT_COLOR,
};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Errors raised while converting host records into `Event`s.
#[derive(Debug)]
pub enum IngestError {
    /// Payload is not valid JSON or not an array of objects.
    Json(serde_json::Error),
    /// Required field is absent.
    MissingField(&'static str),
    /// Timestamp text is in no accepted format.
    InvalidTimestamp { field: &'static str, value: String },
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid event payload: {err}"),
            Self::MissingField(field) => write!(f, "event record is missing `{field}`"),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "invalid `{field}` timestamp: `{value}`")
            }
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Host identifiers arrive either as text or as numbers (epoch-millis tokens).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_event_id(self) -> EventId {
        match self {
            Self::Text(value) => EventId::new(value),
            Self::Number(value) => EventId::new(value.to_string()),
        }
    }
}

/// Loosely shaped host record. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    pub id: Option<RawId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub is_working_day_leave: Option<bool>,
    pub leave_type: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub reminders: Option<Vec<Reminder>>,
    pub has_video_call: Option<bool>,
    pub priority: Option<String>,
    pub tags: Option<Vec<String>>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl RawEvent {
    /// Parses a JSON array into per-record results.
    ///
    /// A malformed element fails only that element, so one bad record does not
    /// drop the rest of the host's startup batch.
    pub fn list_from_json(json: &str) -> Result<Vec<Result<RawEvent, IngestError>>, IngestError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Ok(values
            .into_iter()
            .map(|value| serde_json::from_value::<RawEvent>(value).map_err(IngestError::from))
            .collect())
    }

    /// Converts into a canonical `Event`, defaulting absent fields.
    pub fn into_event(self) -> Result<Event, IngestError> {
        let start_text = self.start.ok_or(IngestError::MissingField("start"))?;
        let end_text = self.end.ok_or(IngestError::MissingField("end"))?;
        let start = parse_instant("start", start_text.as_str())?;
        let end = parse_instant("end", end_text.as_str())?;

        let id = self
            .id
            .map(RawId::into_event_id)
            .filter(|id| !id.is_blank())
            .unwrap_or_else(EventId::generate);

        let mut event = Event::with_id(id, self.title.unwrap_or_default(), start, end);
        event.description = self.description.unwrap_or_default();
        event.color = self
            .color
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string());
        event.location = self.location.unwrap_or_default();
        event.category = self
            .category
            .map(|value| EventCategory::parse(value.as_str()))
            .unwrap_or_default();
        event.is_working_day_leave = self.is_working_day_leave.unwrap_or(false);
        event.leave_type = self.leave_type.filter(|value| !value.trim().is_empty());
        event.is_recurring = self.is_recurring.unwrap_or(false);
        event.recurrence_pattern = self
            .recurrence_pattern
            .as_deref()
            .and_then(RecurrencePattern::parse)
            .unwrap_or_default();
        event.attendees = normalize_labels(self.attendees.unwrap_or_default());
        event.reminders = self.reminders.unwrap_or_default();
        event.has_video_call = self.has_video_call.unwrap_or(false);
        event.priority = self
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default();
        event.tags = normalize_labels(self.tags.unwrap_or_default());
        event.url = self.url.unwrap_or_default();
        event.notes = self.notes.unwrap_or_default();
        Ok(event)
    }
}

/// Parses host timestamps.
///
/// Accepts naive ISO date-times (local wall clock), RFC 3339 instants
/// (converted to local time) and bare `YYYY-MM-DD` dates (local midnight).
pub fn parse_instant(field: &'static str, value: &str) -> Result<NaiveDateTime, IngestError> {
    let trimmed = value.trim();
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Local).naive_local());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(IngestError::InvalidTimestamp {
        field,
        value: trimmed.to_string(),
    })
}
