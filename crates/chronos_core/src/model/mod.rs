//! Calendar domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the scheduling core.
//! - Keep one explicit `Event` shape for every calendar projection.
//!
//! # Invariants
//! - Every committed event is identified by a stable, non-blank `EventId`.
//! - Optional host fields are defaulted once, at ingestion (`raw_event`).

pub mod event;
pub mod navigation;
pub mod raw_event;
pub mod template;
