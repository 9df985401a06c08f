//! FFI use-case API for the host calendar shell.
//!
//! # Responsibility
//! - Expose the calendar command interface and view queries via FRB.
//! - Own the single process-wide calendar session.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Dates cross the boundary as `YYYY-MM-DD`; structured payloads as JSON.
//! - Every call resolves synchronously, in call order.

use chrono::NaiveDate;
use chronos_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CalendarService, DayClickOutcome, EngineConfig, Event, EventDraft, EventId, EventTemplate,
    InMemoryEventStore, LayoutClass, LoggingConfig, NavigationState, RawEvent, TemplateKind,
    ViewMode, WeatherTable,
};
use log::warn;
use serde::Serialize;
use std::sync::{Mutex, OnceLock};

type Session = CalendarService<InMemoryEventStore>;

static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns an empty string on success, an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&LoggingConfig::new(level, log_dir)) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for write commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarActionResponse {
    pub ok: bool,
    /// Affected event id, when the command targets one event.
    pub event_id: Option<String>,
    pub message: String,
}

impl CalendarActionResponse {
    fn success(message: impl Into<String>, event_id: Option<String>) -> Self {
        Self {
            ok: true,
            event_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            event_id: None,
            message: message.into(),
        }
    }
}

/// Navigation snapshot returned by every navigation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    pub ok: bool,
    pub view_mode: String,
    pub current_date: String,
    pub selected_date: String,
    /// Day-click outcome (`drilled_in|list_preview|selected`), when relevant.
    pub outcome: Option<String>,
    pub message: String,
}

impl NavigationResponse {
    fn from_state(state: NavigationState, outcome: Option<DayClickOutcome>) -> Self {
        Self {
            ok: true,
            view_mode: state.view_mode.as_str().to_string(),
            current_date: state.current_date.to_string(),
            selected_date: state.selected_date.to_string(),
            outcome: outcome.map(|value| outcome_label(value).to_string()),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            view_mode: String::new(),
            current_date: String::new(),
            selected_date: String::new(),
            outcome: None,
            message: message.into(),
        }
    }
}

/// JSON payload envelope for queries, drafts and view models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarJsonResponse {
    pub ok: bool,
    pub json: String,
    pub message: String,
}

impl CalendarJsonResponse {
    fn from_value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => Self {
                ok: true,
                json,
                message: String::new(),
            },
            Err(err) => Self::failure(format!("serialization failed: {err}")),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            json: String::new(),
            message: message.into(),
        }
    }
}

/// Replaces the session with a fresh one built from `config_json`
/// (engine defaults when absent), then applies `CHRONOS_*` env overrides.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_init(config_json: Option<String>) -> CalendarActionResponse {
    let config = match build_config(config_json.as_deref()) {
        Ok(config) => config,
        Err(err) => return CalendarActionResponse::failure(format!("calendar_init failed: {err}")),
    };
    match with_session(|session| *session = Session::new(InMemoryEventStore::new(), config)) {
        Ok(()) => CalendarActionResponse::success("Calendar initialized.", None),
        Err(err) => CalendarActionResponse::failure(err),
    }
}

/// Ingests the host's startup event array.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_load_events(events_json: String) -> CalendarActionResponse {
    let records = match RawEvent::list_from_json(&events_json) {
        Ok(records) => records,
        Err(err) => {
            return CalendarActionResponse::failure(format!("calendar_load_events failed: {err}"))
        }
    };
    match with_session(|session| session.load_events(records)) {
        Ok(report) => CalendarActionResponse::success(
            format!(
                "Loaded {} event(s); {} duplicate(s), {} rejected.",
                report.accepted,
                report.duplicates,
                report.rejected.len()
            ),
            None,
        ),
        Err(err) => CalendarActionResponse::failure(err),
    }
}

/// Replaces the weather table with a `{ "YYYY-MM-DD": {temp, condition, humidity} }` map.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_load_weather(weather_json: String) -> CalendarActionResponse {
    let table = match WeatherTable::from_json(&weather_json) {
        Ok(table) => table,
        Err(err) => {
            return CalendarActionResponse::failure(format!("calendar_load_weather failed: {err}"))
        }
    };
    let days = table.len();
    match with_session(|session| session.set_weather(table)) {
        Ok(()) => {
            CalendarActionResponse::success(format!("Loaded weather for {days} day(s)."), None)
        }
        Err(err) => CalendarActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_navigation() -> NavigationResponse {
    navigate(|session| Ok(session.navigation()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_get_current_date() -> String {
    with_session(|session| session.current_date().to_string()).unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_set_view_mode(mode: String) -> NavigationResponse {
    let mode = match ViewMode::parse(&mode) {
        Ok(mode) => mode,
        Err(err) => return NavigationResponse::failure(err.to_string()),
    };
    navigate(|session| {
        session.set_view_mode(mode);
        Ok(session.navigation())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_jump_to_date(date: String) -> NavigationResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return NavigationResponse::failure(err),
    };
    navigate(|session| {
        session.jump_to_date(date);
        Ok(session.navigation())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_go_to_today() -> NavigationResponse {
    navigate(|session| {
        session.go_to_today();
        Ok(session.navigation())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_next() -> NavigationResponse {
    navigate(|session| {
        session.next().map_err(|err| err.to_string())?;
        Ok(session.navigation())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_previous() -> NavigationResponse {
    navigate(|session| {
        session.previous().map_err(|err| err.to_string())?;
        Ok(session.navigation())
    })
}

/// Day-cell click. `compact` is the host's narrow-layout flag.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_click_day(date: String, compact: bool) -> NavigationResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return NavigationResponse::failure(err),
    };
    let layout = if compact {
        LayoutClass::Compact
    } else {
        LayoutClass::Regular
    };
    match with_session(|session| {
        let outcome = session.click_day(date, layout);
        (session.navigation(), outcome)
    }) {
        Ok((state, outcome)) => NavigationResponse::from_state(state, Some(outcome)),
        Err(err) => NavigationResponse::failure(err),
    }
}

/// Year view: mini-month header click.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_open_month(date: String) -> NavigationResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return NavigationResponse::failure(err),
    };
    navigate(|session| {
        session.open_month(date);
        Ok(session.navigation())
    })
}

/// Year view: day click.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_open_day(date: String) -> NavigationResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return NavigationResponse::failure(err),
    };
    navigate(|session| {
        session.open_day(date);
        Ok(session.navigation())
    })
}

/// Canonical event snapshot as a JSON array.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_get_events() -> CalendarJsonResponse {
    json_query(|session| Ok(CalendarJsonResponse::from_value(&session.events())))
}

/// One day's events with conflict flags.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_day_events(date: String) -> CalendarJsonResponse {
    json_query(|session| {
        let date = parse_date(&date)?;
        Ok(CalendarJsonResponse::from_value(&session.events_for_day(date)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_upcoming(limit: Option<u32>) -> CalendarJsonResponse {
    json_query(|session| {
        let limit = limit.map(|value| value as usize);
        Ok(CalendarJsonResponse::from_value(&session.upcoming(limit)))
    })
}

/// Opens a create draft from a built-in kind, overlaid with optional
/// template JSON fields. Returns the draft event JSON; nothing is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_create_from_template(
    kind: String,
    template_json: Option<String>,
) -> CalendarJsonResponse {
    let template = match template_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => match serde_json::from_str::<EventTemplate>(json) {
            Ok(template) => template,
            Err(err) => return CalendarJsonResponse::failure(format!("invalid template: {err}")),
        },
        _ => EventTemplate::builtin(TemplateKind::parse(&kind)),
    };
    json_query(|session| {
        let draft = session
            .create_from_template(&template)
            .map_err(|err| err.to_string())?;
        Ok(CalendarJsonResponse::from_value(&draft.event))
    })
}

/// Time-slot click: opens a one-hour create draft at `hour` on `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_click_time_slot(date: String, hour: u32) -> CalendarJsonResponse {
    json_query(|session| {
        let date = parse_date(&date)?;
        let draft = session
            .click_time_slot(date, hour)
            .map_err(|err| err.to_string())?;
        Ok(CalendarJsonResponse::from_value(&draft.event))
    })
}

/// Opens an edit draft for `event_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_open_event(event_id: String) -> CalendarJsonResponse {
    json_query(|session| {
        let draft = session
            .open_event(&EventId::new(event_id))
            .map_err(|err| err.to_string())?;
        Ok(CalendarJsonResponse::from_value(&draft.event))
    })
}

/// Saves a draft event. A blank `id` creates, a known `id` updates.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_save_event(event_json: String) -> CalendarActionResponse {
    let event = match serde_json::from_str::<Event>(&event_json) {
        Ok(event) => event,
        Err(err) => return CalendarActionResponse::failure(format!("invalid event: {err}")),
    };
    match with_session(|session| session.save_draft(EventDraft::from_event(event))) {
        Ok(Ok(saved)) => {
            CalendarActionResponse::success("Event saved.", Some(saved.id.to_string()))
        }
        Ok(Err(err)) => {
            CalendarActionResponse::failure(format!("calendar_save_event failed: {err}"))
        }
        Err(err) => CalendarActionResponse::failure(err),
    }
}

/// Committed events overlapping a draft event's window.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_draft_conflicts(event_json: String) -> CalendarJsonResponse {
    json_query(|session| {
        let event = serde_json::from_str::<Event>(&event_json)
            .map_err(|err| format!("invalid event: {err}"))?;
        let conflicts = session.draft_conflicts(&EventDraft::from_event(event));
        Ok(CalendarJsonResponse::from_value(&conflicts))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_discard_draft() -> CalendarActionResponse {
    match with_session(|session| session.discard_draft().is_some()) {
        Ok(true) => CalendarActionResponse::success("Draft discarded.", None),
        Ok(false) => CalendarActionResponse::success("No draft open.", None),
        Err(err) => CalendarActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn calendar_delete_event(event_id: String) -> CalendarActionResponse {
    let id = EventId::new(event_id);
    match with_session(|session| session.delete_event(&id)) {
        Ok(()) => CalendarActionResponse::success("Event deleted.", Some(id.to_string())),
        Err(err) => CalendarActionResponse::failure(err),
    }
}

/// Drag-move to `date`, keeping time-of-day and duration.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_move_event(event_id: String, date: String) -> CalendarActionResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return CalendarActionResponse::failure(err),
    };
    let id = EventId::new(event_id);
    match with_session(|session| session.move_event(&id, date)) {
        Ok(Ok(moved)) => {
            CalendarActionResponse::success("Event moved.", Some(moved.id.to_string()))
        }
        Ok(Err(err)) => {
            CalendarActionResponse::failure(format!("calendar_move_event failed: {err}"))
        }
        Err(err) => CalendarActionResponse::failure(err),
    }
}

/// Render-ready view model for `mode`, or for the active view mode when
/// `mode` is absent.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_view(mode: Option<String>) -> CalendarJsonResponse {
    json_query(|session| {
        let mode = match mode.as_deref() {
            Some(raw) => ViewMode::parse(raw).map_err(|err| err.to_string())?,
            None => session.navigation().view_mode,
        };
        let response = match mode {
            ViewMode::Year => session
                .year_view()
                .map(|view| CalendarJsonResponse::from_value(&view)),
            ViewMode::Month => session
                .month_view()
                .map(|view| CalendarJsonResponse::from_value(&view)),
            ViewMode::Week => session
                .week_view()
                .map(|view| CalendarJsonResponse::from_value(&view)),
            ViewMode::Day => session
                .day_view()
                .map(|view| CalendarJsonResponse::from_value(&view)),
        };
        response.map_err(|err| err.to_string())
    })
}

fn build_config(config_json: Option<&str>) -> Result<EngineConfig, String> {
    let mut config = match config_json.map(str::trim) {
        Some(json) if !json.is_empty() => {
            EngineConfig::from_json_str(json).map_err(|err| err.to_string())?
        }
        _ => EngineConfig::default(),
    };
    config.apply_env_overrides().map_err(|err| err.to_string())?;
    Ok(config)
}

fn session() -> &'static Mutex<Session> {
    SESSION.get_or_init(|| {
        let config = build_config(None).unwrap_or_else(|err| {
            warn!(
                "event=session_init module=ffi status=fallback error={}",
                err
            );
            EngineConfig::default()
        });
        Mutex::new(Session::new(InMemoryEventStore::new(), config))
    })
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
    let mut guard = session()
        .lock()
        .map_err(|_| "calendar session lock poisoned".to_string())?;
    Ok(f(&mut guard))
}

fn navigate(f: impl FnOnce(&mut Session) -> Result<NavigationState, String>) -> NavigationResponse {
    match with_session(f) {
        Ok(Ok(state)) => NavigationResponse::from_state(state, None),
        Ok(Err(err)) | Err(err) => NavigationResponse::failure(err),
    }
}

fn json_query(
    f: impl FnOnce(&mut Session) -> Result<CalendarJsonResponse, String>,
) -> CalendarJsonResponse {
    match with_session(f) {
        Ok(Ok(response)) => response,
        Ok(Err(err)) | Err(err) => CalendarJsonResponse::failure(err),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date `{}` (expected YYYY-MM-DD): {err}", value.trim()))
}

fn outcome_label(outcome: DayClickOutcome) -> &'static str {
    match outcome {
        DayClickOutcome::DrilledIn => "drilled_in",
        DayClickOutcome::ListPreview => "list_preview",
        DayClickOutcome::Selected => "selected",
    }
}
