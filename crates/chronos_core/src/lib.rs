//! Core scheduling and layout engine for the Chronos calendar.
//! This crate is the single source of truth for event and navigation invariants.

pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod weather;

pub use config::{ConfigError, EngineConfig, LoggingConfig};
pub use layout::conflict::{annotate, annotate_with, AnnotatedEvent, ConflictStrategy};
pub use layout::geometry::{clip_to_day, position, position_in_day, TimelineGeometry};
pub use layout::grid::{month_grid, year_grid, MonthGrid, WeekStart, YearGrid};
pub use layout::labels::{format_hour, format_time_range, TimeLabelStyle};
pub use layout::{LayoutError, LayoutResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{Event, EventCategory, EventId, EventValidationError, Priority};
pub use model::navigation::{LayoutClass, NavigationState, ViewMode};
pub use model::raw_event::{IngestError, RawEvent};
pub use model::template::{DraftValidationError, EventDraft, EventTemplate, TemplateKind};
pub use repo::event_store::{
    EventRepository, InMemoryEventStore, LoadReport, StoreError, StoreResult,
};
pub use service::calendar_service::{CalendarService, CalendarServiceError, ServiceResult};
pub use service::navigation::{DayClickOutcome, NavigationError, NavigationMachine};
pub use weather::{DayWeather, WeatherLookup, WeatherTable};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
