//! Calendar use-case services.
//!
//! # Responsibility
//! - Drive navigation transitions and event commands for the host shell.
//! - Assemble render-ready view models from store queries and layout.
//!
//! # See also
//! - `crate::repo::event_store` for the storage contract.

pub mod calendar_service;
pub mod navigation;
pub mod view_models;
