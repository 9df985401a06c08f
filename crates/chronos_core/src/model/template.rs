//! Create-flow templates and editable drafts.
//!
//! # Responsibility
//! - Provide built-in "quick create" templates.
//! - Model the uncommitted draft a form edits before an explicit save.
//!
//! # Invariants
//! - Opening a draft never inserts anything; only a save commits.
//! - A new draft carries a blank id; the id is assigned on save.

use crate::model::event::{
    normalize_labels, Event, EventCategory, EventId, Priority, RecurrencePattern, Reminder,
    DEFAULT_EVENT_COLOR,
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Built-in template kinds offered by the host's "create" menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    #[default]
    Event,
    Meeting,
    Task,
    Appointment,
    Reminder,
    Birthday,
}

impl TemplateKind {
    /// Parses a kind name; unknown names fall back to `Event`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "meeting" => Self::Meeting,
            "task" => Self::Task,
            "appointment" => Self::Appointment,
            "reminder" => Self::Reminder,
            "birthday" => Self::Birthday,
            _ => Self::Event,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Meeting => "meeting",
            Self::Task => "task",
            Self::Appointment => "appointment",
            Self::Reminder => "reminder",
            Self::Birthday => "birthday",
        }
    }
}

/// Pre-populated defaults for a create flow.
///
/// `None` fields fall back to engine defaults when a draft is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTemplate {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub color: Option<String>,
    pub duration_minutes: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub has_video_call: bool,
    pub attendees: Vec<String>,
    pub reminders: Option<Vec<Reminder>>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub priority: Option<Priority>,
}

impl EventTemplate {
    pub fn builtin(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Event => Self {
                title: "New Event".to_string(),
                color: Some(DEFAULT_EVENT_COLOR.to_string()),
                ..Self::default()
            },
            TemplateKind::Meeting => Self {
                title: "Team Meeting".to_string(),
                description: "Discuss project progress and next steps".to_string(),
                color: Some("#8B5CF6".to_string()),
                has_video_call: true,
                ..Self::default()
            },
            TemplateKind::Task => Self {
                title: "New Task".to_string(),
                description: "Task to be completed".to_string(),
                color: Some("#F59E0B".to_string()),
                ..Self::default()
            },
            TemplateKind::Appointment => Self {
                title: "Appointment".to_string(),
                description: "Personal appointment".to_string(),
                category: EventCategory::Personal,
                color: Some("#10B981".to_string()),
                ..Self::default()
            },
            TemplateKind::Reminder => Self {
                title: "Reminder".to_string(),
                description: "Important reminder".to_string(),
                category: EventCategory::Personal,
                color: Some("#EC4899".to_string()),
                duration_minutes: Some(30),
                reminders: Some(vec![Reminder::minutes(15)]),
                ..Self::default()
            },
            TemplateKind::Birthday => Self {
                title: "Birthday Celebration".to_string(),
                description: "Annual birthday celebration".to_string(),
                category: EventCategory::Social,
                color: Some("#F59E0B".to_string()),
                is_recurring: true,
                recurrence_pattern: Some(RecurrencePattern::Yearly),
                ..Self::default()
            },
        }
    }
}

/// Engine defaults a template falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDefaults {
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    pub color: String,
}

/// One field-level validation problem in a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftIssue {
    MissingTitle,
    InvalidRange,
    InvalidAttendee(String),
    /// Template duration (minutes) puts the end outside the calendar range.
    InvalidDuration(i64),
}

impl DraftIssue {
    /// Form field the issue belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::InvalidRange => "time",
            Self::InvalidAttendee(_) => "attendees",
            Self::InvalidDuration(_) => "duration",
        }
    }
}

impl Display for DraftIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Title is required"),
            Self::InvalidRange => write!(f, "End time must be after start time"),
            Self::InvalidAttendee(value) => {
                write!(f, "Please enter valid email addresses (`{value}`)")
            }
            Self::InvalidDuration(minutes) => {
                write!(f, "Duration of {minutes} minutes is out of range")
            }
        }
    }
}

/// Draft validation failure carrying every issue found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftValidationError {
    pub issues: Vec<DraftIssue>,
}

impl DraftValidationError {
    pub fn has_issue(&self, issue: &DraftIssue) -> bool {
        self.issues.contains(issue)
    }
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .issues
            .iter()
            .map(|issue| format!("{}: {issue}", issue.field()))
            .collect::<Vec<_>>();
        write!(f, "invalid event draft: {}", messages.join("; "))
    }
}

impl Error for DraftValidationError {}

/// Uncommitted event edited by a create/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub event: Event,
}

impl EventDraft {
    /// Opens a create draft from a template.
    ///
    /// Fails with `InvalidDuration` when the end instant cannot be represented.
    pub fn from_template(
        template: &EventTemplate,
        defaults: &DraftDefaults,
    ) -> Result<Self, DraftValidationError> {
        let start = template.start.unwrap_or(defaults.start);
        let minutes = template
            .duration_minutes
            .filter(|value| *value > 0)
            .unwrap_or(defaults.duration_minutes);
        let end = Duration::try_minutes(minutes)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or_else(|| DraftValidationError {
                issues: vec![DraftIssue::InvalidDuration(minutes)],
            })?;

        let mut event = Event::with_id(EventId::default(), template.title.clone(), start, end);
        event.description = template.description.clone();
        event.category = template.category.clone();
        event.color = template
            .color
            .clone()
            .unwrap_or_else(|| defaults.color.clone());
        event.has_video_call = template.has_video_call;
        event.attendees = normalize_labels(&template.attendees);
        event.reminders = template
            .reminders
            .clone()
            .unwrap_or_else(|| vec![Reminder::minutes(30)]);
        event.is_recurring = template.is_recurring;
        event.recurrence_pattern = template.recurrence_pattern.unwrap_or_default();
        event.priority = template.priority.unwrap_or_default();
        Ok(Self { event })
    }

    /// Opens an edit draft over a committed event.
    pub fn from_event(event: Event) -> Self {
        Self { event }
    }

    pub fn is_new(&self) -> bool {
        self.event.id.is_blank()
    }

    /// Form-level checks: non-blank title, `start < end`, attendee addresses.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let mut issues = Vec::new();
        if self.event.title.trim().is_empty() {
            issues.push(DraftIssue::MissingTitle);
        }
        if self.event.start >= self.event.end {
            issues.push(DraftIssue::InvalidRange);
        }
        if let Some(bad) = self
            .event
            .attendees
            .iter()
            .find(|attendee| !attendee.contains('@'))
        {
            issues.push(DraftIssue::InvalidAttendee(bad.clone()));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(DraftValidationError { issues })
        }
    }

    /// Consumes the draft into a normalized event ready to commit.
    pub fn into_event(self) -> Event {
        let mut event = self.event;
        event.title = event.title.trim().to_string();
        event.attendees = normalize_labels(&event.attendees);
        event.tags = normalize_labels(&event.tags);
        event
    }
}
