//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical record rendered by year/month/week/day projections.
//! - Own the identity rule used by every deduplicating read path.
//! - Own the time-range rule enforced by create/update commands.
//!
//! # Invariants
//! - `id` is never blank once an event is committed, and never changes after.
//! - `start < end` for every event accepted by a create/update command.
//! - Conflict flags are view-scoped and never stored on `Event`.
//!
//! # See also
//! - `crate::layout::conflict` for the transient `has_conflict` annotation.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Color applied when the host supplies none.
pub const DEFAULT_EVENT_COLOR: &str = "#6366F1";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Opaque, stable event identifier.
///
/// Host data may carry numeric or textual ids; both are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wraps a host-provided identifier (surrounding whitespace is dropped).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Generates a fresh identifier for newly created events.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Blank ids mark events that have not been committed yet.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Event category tag.
///
/// The set is open: unknown tags are preserved as `Other` in lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    #[default]
    Work,
    Personal,
    Social,
    Holiday,
    Training,
    Health,
    Travel,
    Cultural,
    Religious,
    Entertainment,
    Other(String),
}

impl EventCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Social => "social",
            Self::Holiday => "holiday",
            Self::Training => "training",
            Self::Health => "health",
            Self::Travel => "travel",
            Self::Cultural => "cultural",
            Self::Religious => "religious",
            Self::Entertainment => "entertainment",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Parses a category tag; blank input maps to the default category.
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "work" => Self::Work,
            "personal" => Self::Personal,
            "social" => Self::Social,
            "holiday" => Self::Holiday,
            "training" => Self::Training,
            "health" => Self::Health,
            "travel" => Self::Travel,
            "cultural" => Self::Cultural,
            "religious" => Self::Religious,
            "entertainment" => Self::Entertainment,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for EventCategory {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<EventCategory> for String {
    fn from(value: EventCategory) -> Self {
        value.as_str().to_string()
    }
}

/// Display-only priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Declarative recurrence hint. Never expanded into extra occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrencePattern {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

/// Reminder offset before the event start.
///
/// Serialized as `{ "time": 30, "unit": "minutes" }` to match host records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "time")]
    pub offset: u32,
    pub unit: ReminderUnit,
}

impl Reminder {
    pub fn minutes(offset: u32) -> Self {
        Self {
            offset,
            unit: ReminderUnit::Minutes,
        }
    }

    /// Offset as a signed duration, for hosts that schedule notifications.
    pub fn as_duration(&self) -> Duration {
        let offset = i64::from(self.offset);
        match self.unit {
            ReminderUnit::Minutes => Duration::minutes(offset),
            ReminderUnit::Hours => Duration::hours(offset),
            ReminderUnit::Days => Duration::days(offset),
            ReminderUnit::Weeks => Duration::weeks(offset),
        }
    }
}

/// Validation errors for committed event state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// `start` is not strictly before `end`.
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { start, end } => {
                write!(f, "event end ({end}) must be after event start ({start})")
            }
        }
    }
}

impl Error for EventValidationError {}

/// Canonical scheduled item: one concrete occurrence with a start and end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: EventCategory,
    /// Together with `EventCategory::Holiday`, marks the day as non-working.
    #[serde(default)]
    pub is_working_day_leave: bool,
    #[serde(default)]
    pub leave_type: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: RecurrencePattern,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub has_video_call: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub notes: String,
}

impl Event {
    /// Creates an event with a generated id and defaulted optional fields.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::with_id(EventId::generate(), title, start, end)
    }

    /// Creates an event with a caller-provided id (import paths).
    ///
    /// Does not validate the time range; commands do that via `validate()`.
    pub fn with_id(
        id: EventId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            start,
            end,
            color: DEFAULT_EVENT_COLOR.to_string(),
            location: String::new(),
            category: EventCategory::default(),
            is_working_day_leave: false,
            leave_type: None,
            is_recurring: false,
            recurrence_pattern: RecurrencePattern::default(),
            attendees: Vec::new(),
            reminders: Vec::new(),
            has_video_call: false,
            priority: Priority::default(),
            tags: Vec::new(),
            url: String::new(),
            notes: String::new(),
        }
    }

    /// Enforces `start < end`.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.start >= self.end {
            return Err(EventValidationError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Calendar day of `start`; the day an event is listed under.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_date() == date
    }

    /// Holiday and working-day-leave events mark a fully non-working day and
    /// never take part in conflict detection.
    pub fn is_leave(&self) -> bool {
        self.is_working_day_leave || self.category == EventCategory::Holiday
    }

    /// Identity rule shared by every deduplicating path: same id, or same
    /// title on the same `start` calendar day.
    pub fn same_identity(&self, other: &Event) -> bool {
        if !self.id.is_blank() && self.id == other.id {
            return true;
        }
        self.title == other.title && self.start_date() == other.start_date()
    }

    /// Open-interval overlap; back-to-back events do not overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns a copy moved to `date`, keeping time-of-day and duration.
    /// `None` when the moved end falls outside the representable range.
    pub fn moved_to(&self, date: NaiveDate) -> Option<Event> {
        let start = date.and_time(self.start.time());
        let end = start.checked_add_signed(self.duration())?;
        let mut moved = self.clone();
        moved.start = start;
        moved.end = end;
        Some(moved)
    }

    /// Midnight at the start of the event's first day.
    pub fn day_start(&self) -> NaiveDateTime {
        self.start_date().and_time(NaiveTime::MIN)
    }
}

/// Normalizes free-form labels (tags, attendees): whitespace collapsed,
/// blanks dropped, duplicates removed keeping first occurrence order.
pub fn normalize_labels<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for value in values {
        let collapsed = WHITESPACE_RE.replace_all(value.as_ref(), " ");
        let trimmed = collapsed.trim();
        if trimmed.is_empty() || normalized.iter().any(|existing| existing == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}
