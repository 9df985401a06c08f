//! Event store contracts and in-memory implementation.
//!
//! # Responsibility
//! - Hold the canonical event collection and expose pull-based queries.
//! - Apply the identity rule on writes and, defensively, on every read.
//!
//! # Invariants
//! - Write commands call `Event::validate()` before mutating the collection.
//! - Reads never expose two events with the same identity.
//! - Enumeration is ascending by `start`; ties keep insertion order.
//! - Reads never mutate the collection.

use crate::model::event::{Event, EventId, EventValidationError};
use crate::model::raw_event::{IngestError, RawEvent};
use chrono::{NaiveDate, NaiveTime};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for event write commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(EventValidationError),
    NotFound(EventId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<EventValidationError> for StoreError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of one host batch load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records that entered the collection.
    pub accepted: usize,
    /// Records collapsed into an earlier record with the same identity.
    pub duplicates: usize,
    /// Records with reversed or empty time ranges (kept, not corrected).
    pub reversed_ranges: usize,
    /// Records rejected during conversion, by batch index.
    pub rejected: Vec<(usize, IngestError)>,
}

/// Repository interface for the canonical event collection.
///
/// Implementors provide storage primitives; range and day queries are derived
/// from `all()` so that every read shares one dedup/sort path.
pub trait EventRepository {
    /// Creates or replaces an event by identity. Assigns an id when blank.
    fn upsert(&mut self, event: Event) -> StoreResult<Event>;
    /// Replaces an existing event by id; unknown ids are `NotFound`.
    /// Other records sharing the new title and day are kept; reads collapse
    /// them.
    fn update(&mut self, event: Event) -> StoreResult<Event>;
    /// Deletes by id; unknown ids are a no-op.
    fn remove(&mut self, id: &EventId);
    fn get(&self, id: &EventId) -> Option<Event>;
    /// Deduplicated events in canonical order.
    fn all(&self) -> Vec<Event>;
    /// Stores `event` unless an entry with the same identity exists.
    /// No range validation: this is the ingestion path for host data.
    fn insert_if_absent(&mut self, event: Event) -> bool;

    /// Ingests a host batch. Pre-existing data is not range-checked here;
    /// reversed ranges are counted and logged but kept as supplied.
    fn load(&mut self, records: Vec<Result<RawEvent, IngestError>>) -> LoadReport {
        let mut report = LoadReport::default();
        for (index, record) in records.into_iter().enumerate() {
            let event = match record.and_then(RawEvent::into_event) {
                Ok(event) => event,
                Err(err) => {
                    warn!(
                        "event=store_load module=repo status=rejected index={} error={}",
                        index, err
                    );
                    report.rejected.push((index, err));
                    continue;
                }
            };

            if event.validate().is_err() {
                report.reversed_ranges += 1;
                warn!(
                    "event=store_load module=repo status=reversed_range id={}",
                    event.id
                );
            }

            if self.insert_if_absent(event) {
                report.accepted += 1;
            } else {
                report.duplicates += 1;
            }
        }

        info!(
            "event=store_load module=repo status=ok accepted={} duplicates={} reversed={} rejected={}",
            report.accepted,
            report.duplicates,
            report.reversed_ranges,
            report.rejected.len()
        );
        report
    }

    /// Events whose `start` falls on `date`.
    fn for_day(&self, date: NaiveDate) -> Vec<Event> {
        self.all()
            .into_iter()
            .filter(|event| event.starts_on(date))
            .collect()
    }

    /// Events whose `start` falls in `[start_date, end_date_exclusive)`.
    fn for_range(&self, start_date: NaiveDate, end_date_exclusive: NaiveDate) -> Vec<Event> {
        self.all()
            .into_iter()
            .filter(|event| {
                let day = event.start_date();
                day >= start_date && day < end_date_exclusive
            })
            .collect()
    }

    /// First `limit` events starting at or after midnight of `from`.
    fn upcoming(&self, from: NaiveDate, limit: usize) -> Vec<Event> {
        let threshold = from.and_time(NaiveTime::MIN);
        self.all()
            .into_iter()
            .filter(|event| event.start >= threshold)
            .take(limit)
            .collect()
    }

    fn day_has_events(&self, date: NaiveDate) -> bool {
        self.all().iter().any(|event| event.starts_on(date))
    }

    /// A day is non-working when any event on it is a holiday or leave.
    fn is_leave_day(&self, date: NaiveDate) -> bool {
        self.for_day(date).iter().any(Event::is_leave)
    }
}

/// Applies the identity rule (first occurrence wins) and sorts stably by start.
pub fn canonicalize(events: &[Event]) -> Vec<Event> {
    let mut unique: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if unique.iter().any(|kept| kept.same_identity(event)) {
            continue;
        }
        unique.push(event.clone());
    }
    unique.sort_by_key(|event| event.start);
    unique
}

/// In-memory event store owned by the engine.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Vec<Event>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from already-typed events, collapsing duplicates.
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut store = Self::new();
        for event in events {
            store.insert_if_absent(event);
        }
        store
    }

    /// Raw entry count (before read-path dedup).
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every entry other than `keep_index` that collides with `event`.
    fn drop_collisions(&mut self, keep_index: usize, event: &Event) -> usize {
        let before = self.events.len();
        let mut index = 0;
        self.events.retain(|existing| {
            let keep = index == keep_index || !existing.same_identity(event);
            index += 1;
            keep
        });
        before - self.events.len()
    }
}

impl EventRepository for InMemoryEventStore {
    fn upsert(&mut self, mut event: Event) -> StoreResult<Event> {
        event.validate()?;

        if event.id.is_blank() {
            event.id = EventId::generate();
        }

        let position = self
            .events
            .iter()
            .position(|existing| existing.same_identity(&event));
        match position {
            Some(index) => {
                // Stored ids are immutable: a record matched by title and day
                // takes over the stored id.
                event.id = self.events[index].id.clone();
                self.events[index] = event.clone();
                let dropped = self.drop_collisions(index, &event);
                debug!(
                    "event=store_upsert module=repo status=ok mode=replace id={} dropped={}",
                    event.id, dropped
                );
            }
            None => {
                self.events.push(event.clone());
                debug!(
                    "event=store_upsert module=repo status=ok mode=append id={}",
                    event.id
                );
            }
        }

        Ok(event)
    }

    fn update(&mut self, event: Event) -> StoreResult<Event> {
        event.validate()?;

        let index = self
            .events
            .iter()
            .position(|existing| existing.id == event.id)
            .ok_or_else(|| StoreError::NotFound(event.id.clone()))?;
        self.events[index] = event.clone();
        debug!("event=store_update module=repo status=ok id={}", event.id);
        Ok(event)
    }

    fn remove(&mut self, id: &EventId) {
        let before = self.events.len();
        self.events.retain(|existing| &existing.id != id);
        debug!(
            "event=store_remove module=repo status=ok id={} removed={}",
            id,
            before - self.events.len()
        );
    }

    fn get(&self, id: &EventId) -> Option<Event> {
        self.events.iter().find(|event| &event.id == id).cloned()
    }

    fn insert_if_absent(&mut self, event: Event) -> bool {
        if self.events.iter().any(|existing| existing.same_identity(&event)) {
            return false;
        }
        self.events.push(event);
        true
    }

    fn all(&self) -> Vec<Event> {
        canonicalize(&self.events)
    }
}
