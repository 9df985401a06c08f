//! Host-shell bindings for the Chronos calendar core.

pub mod api;
