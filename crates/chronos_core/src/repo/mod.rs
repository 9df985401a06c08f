//! Event storage abstractions.
//!
//! # Responsibility
//! - Define the pull-based query contract views read from.
//! - Keep the mutable event collection owned by the core.
//!
//! # Invariants
//! - Write commands enforce `Event::validate()` before mutating.
//! - Write commands report semantic errors (`NotFound`) instead of no-ops,
//!   except `remove`, which is a no-op for unknown ids.

pub mod event_store;
