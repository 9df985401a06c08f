//! Day-local conflict detection.
//!
//! # Invariants
//! - Two events conflict iff they start on the same calendar day and
//!   `a.start < b.end && a.end > b.start`.
//! - Leave events (holiday / working-day leave) never conflict and never
//!   cause another event to be flagged.
//! - Flags are recomputed from scratch on every call; the pairwise and sweep
//!   strategies produce identical flags.

use crate::model::event::Event;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event plus its view-scoped conflict flag. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub has_conflict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Compare every pair, O(n^2). Realistic days hold tens of events.
    #[default]
    Pairwise,
    /// Sort by start and keep an active set.
    Sweep,
}

/// Whether two events conflict under the participation rule.
pub fn conflicts(a: &Event, b: &Event) -> bool {
    !a.is_leave() && !b.is_leave() && a.overlaps(b)
}

/// Annotates one day's events using the pairwise strategy.
pub fn annotate(events: &[Event]) -> Vec<AnnotatedEvent> {
    annotate_with(events, ConflictStrategy::Pairwise)
}

/// Annotates events, comparing only events that start on the same day.
/// Duplicate ids are collapsed (first wins) and input order is otherwise
/// preserved.
pub fn annotate_with(events: &[Event], strategy: ConflictStrategy) -> Vec<AnnotatedEvent> {
    let mut unique: Vec<&Event> = Vec::with_capacity(events.len());
    for event in events {
        if !unique.iter().any(|kept| kept.id == event.id) {
            unique.push(event);
        }
    }

    let mut days: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (index, event) in unique.iter().enumerate() {
        days.entry(event.start_date()).or_default().push(index);
    }

    let mut flags = vec![false; unique.len()];
    for indices in days.values() {
        let day_events: Vec<&Event> = indices.iter().map(|index| unique[*index]).collect();
        let day_flags = match strategy {
            ConflictStrategy::Pairwise => pairwise_flags(&day_events),
            ConflictStrategy::Sweep => sweep_flags(&day_events),
        };
        for (index, flag) in indices.iter().zip(day_flags) {
            flags[*index] = flag;
        }
    }

    unique
        .into_iter()
        .zip(flags)
        .map(|(event, has_conflict)| AnnotatedEvent {
            event: event.clone(),
            has_conflict,
        })
        .collect()
}

/// Committed events that would overlap `candidate`, ignoring the candidate's
/// own stored version and leave events.
pub fn overlapping<'a>(candidate: &Event, others: &'a [Event]) -> Vec<&'a Event> {
    others
        .iter()
        .filter(|other| other.id != candidate.id && conflicts(candidate, other))
        .collect()
}

fn pairwise_flags(events: &[&Event]) -> Vec<bool> {
    let mut flags = vec![false; events.len()];
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            if conflicts(events[i], events[j]) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    flags
}

fn sweep_flags(events: &[&Event]) -> Vec<bool> {
    let mut flags = vec![false; events.len()];
    let mut order: Vec<usize> = (0..events.len())
        .filter(|index| !events[*index].is_leave())
        .collect();
    order.sort_by_key(|index| (events[*index].start, events[*index].end));

    // Active entries all start at or before the current event; an entry whose
    // end is at or before the current start can never overlap anything later.
    let mut active: Vec<usize> = Vec::new();
    for current in order {
        let event = events[current];
        active.retain(|other| events[*other].end > event.start);
        for other in &active {
            if event.end > events[*other].start {
                flags[current] = true;
                flags[*other] = true;
            }
        }
        active.push(current);
    }
    flags
}
