//! Calendar command facade.
//!
//! # Responsibility
//! - Expose the imperative command surface the host shell drives
//!   (navigation, create/edit/save drafts, delete, drag-move).
//! - Serve pull-based queries and render-ready view models.
//!
//! # Invariants
//! - Every command runs to completion synchronously; there is no queue.
//! - Opening a draft never writes to the store; only `save_draft` commits.
//! - Leave/holiday events cannot be drag-moved.
//! - Conflict flags are computed per query and never written back.
//!
//! # See also
//! - `crate::service::navigation` for transition rules.
//! - `crate::service::view_models` for projection shapes.

use crate::config::EngineConfig;
use crate::layout::conflict::{annotate_with, overlapping, AnnotatedEvent};
use crate::layout::geometry::slot_start;
use crate::layout::LayoutError;
use crate::model::event::{Event, EventId};
use crate::model::navigation::{LayoutClass, NavigationState, ViewMode};
use crate::model::raw_event::{IngestError, RawEvent};
use crate::model::template::{
    DraftDefaults, DraftValidationError, EventDraft, EventTemplate, TemplateKind,
};
use crate::repo::event_store::{EventRepository, LoadReport, StoreError};
use crate::service::navigation::{DayClickOutcome, NavigationError, NavigationMachine};
use crate::service::view_models::{
    build_day_view, build_month_view, build_week_view, build_year_view, DayView, MonthView,
    ViewContext, WeekView, YearView,
};
use crate::weather::{DayWeather, WeatherLookup, WeatherTable};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for calendar commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarServiceError {
    /// Store rejected the write (`start >= end`).
    Store(StoreError),
    /// Form-level draft validation failed.
    Draft(DraftValidationError),
    Layout(LayoutError),
    Navigation(NavigationError),
    EventNotFound(EventId),
    /// A pending-draft command ran with no open draft.
    NoPendingDraft,
    /// Holiday and working-day-leave events are fixed to their day.
    LeaveEventLocked(EventId),
}

impl Display for CalendarServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Draft(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "{err}"),
            Self::Navigation(err) => write!(f, "{err}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::NoPendingDraft => write!(f, "no event draft is open"),
            Self::LeaveEventLocked(id) => write!(f, "leave event {id} cannot be moved"),
        }
    }
}

impl Error for CalendarServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Draft(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Navigation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CalendarServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::EventNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<DraftValidationError> for CalendarServiceError {
    fn from(value: DraftValidationError) -> Self {
        Self::Draft(value)
    }
}

impl From<LayoutError> for CalendarServiceError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}

impl From<NavigationError> for CalendarServiceError {
    fn from(value: NavigationError) -> Self {
        Self::Navigation(value)
    }
}

pub type ServiceResult<T> = Result<T, CalendarServiceError>;

/// Calendar facade over an event repository and a weather source.
pub struct CalendarService<R: EventRepository, W: WeatherLookup = WeatherTable> {
    repo: R,
    weather: W,
    config: EngineConfig,
    navigation: NavigationMachine,
    draft: Option<EventDraft>,
}

impl<R: EventRepository> CalendarService<R, WeatherTable> {
    /// Creates a service with an empty weather table.
    pub fn new(repo: R, config: EngineConfig) -> Self {
        Self::with_weather(repo, WeatherTable::new(), config)
    }
}

impl<R: EventRepository, W: WeatherLookup> CalendarService<R, W> {
    /// Starts in month view, anchored and selected on today.
    pub fn with_weather(repo: R, weather: W, config: EngineConfig) -> Self {
        let navigation = NavigationMachine::new(config.today());
        Self {
            repo,
            weather,
            config,
            navigation,
            draft: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn set_weather(&mut self, weather: W) {
        self.weather = weather;
    }

    pub fn weather_on(&self, date: NaiveDate) -> Option<DayWeather> {
        self.weather.weather_on(date)
    }

    /// Reference "today" (pinned or system clock).
    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }

    /// Ingests the host's startup batch.
    pub fn load_events(&mut self, records: Vec<Result<RawEvent, IngestError>>) -> LoadReport {
        self.repo.load(records)
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation.state()
    }

    pub fn current_date(&self) -> NaiveDate {
        self.navigation.current_date()
    }

    pub fn go_to_today(&mut self) {
        let today = self.today();
        self.navigation.go_to(today);
        debug!("event=go_to_today module=service status=ok date={}", today);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.navigation.set_view_mode(mode);
        debug!(
            "event=set_view_mode module=service status=ok mode={}",
            mode.as_str()
        );
    }

    pub fn jump_to_date(&mut self, date: NaiveDate) {
        self.navigation.jump_to_date(date);
        debug!("event=jump_to_date module=service status=ok date={}", date);
    }

    pub fn next(&mut self) -> ServiceResult<NaiveDate> {
        Ok(self.navigation.next()?)
    }

    pub fn previous(&mut self) -> ServiceResult<NaiveDate> {
        Ok(self.navigation.previous()?)
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.navigation.select(date);
    }

    /// Day-cell click; `layout` is the host's current breakpoint class.
    pub fn click_day(&mut self, date: NaiveDate, layout: LayoutClass) -> DayClickOutcome {
        let has_events = self.repo.day_has_events(date);
        let outcome = self.navigation.click_day(date, has_events, layout);
        debug!(
            "event=click_day module=service status=ok date={} outcome={:?}",
            date, outcome
        );
        outcome
    }

    /// "More events" path: selects `date` and returns its annotated events.
    pub fn preview_day(&mut self, date: NaiveDate) -> Vec<AnnotatedEvent> {
        self.navigation.select(date);
        self.events_for_day(date)
    }

    /// Time-slot click: selects the day and opens a create draft at `hour`.
    pub fn click_time_slot(&mut self, date: NaiveDate, hour: u32) -> ServiceResult<EventDraft> {
        let start = slot_start(date, hour)?;
        self.navigation.select(date);
        self.create_at(start)
    }

    pub fn open_month(&mut self, date: NaiveDate) {
        self.navigation.open_month(date);
    }

    pub fn open_day(&mut self, date: NaiveDate) {
        self.navigation.open_day(date);
    }

    /// Snapshot of every event in canonical order.
    pub fn events(&self) -> Vec<Event> {
        self.repo.all()
    }

    pub fn get_event(&self, id: &EventId) -> Option<Event> {
        self.repo.get(id)
    }

    /// Events starting on `date`, annotated with conflict flags.
    pub fn events_for_day(&self, date: NaiveDate) -> Vec<AnnotatedEvent> {
        annotate_with(&self.repo.for_day(date), self.config.conflict_strategy)
    }

    pub fn events_in_range(&self, start: NaiveDate, end_exclusive: NaiveDate) -> Vec<Event> {
        self.repo.for_range(start, end_exclusive)
    }

    /// Upcoming events from today; `None` uses the configured limit.
    pub fn upcoming(&self, limit: Option<usize>) -> Vec<Event> {
        let limit = limit.unwrap_or(self.config.upcoming_limit);
        self.repo.upcoming(self.today(), limit)
    }

    pub fn day_has_events(&self, date: NaiveDate) -> bool {
        self.repo.day_has_events(date)
    }

    pub fn is_leave_day(&self, date: NaiveDate) -> bool {
        self.repo.is_leave_day(date)
    }

    /// Opens a create draft pre-populated from `template`. Nothing is stored.
    pub fn create_from_template(
        &mut self,
        template: &EventTemplate,
    ) -> ServiceResult<EventDraft> {
        let defaults = self.draft_defaults(self.default_draft_start());
        let draft = EventDraft::from_template(template, &defaults)?;
        Ok(self.open_draft(draft))
    }

    pub fn create_from_kind(&mut self, kind: TemplateKind) -> ServiceResult<EventDraft> {
        self.create_from_template(&EventTemplate::builtin(kind))
    }

    /// Opens a blank create draft starting at `start`.
    pub fn create_at(&mut self, start: NaiveDateTime) -> ServiceResult<EventDraft> {
        let defaults = self.draft_defaults(start);
        let draft = EventDraft::from_template(&EventTemplate::default(), &defaults)?;
        Ok(self.open_draft(draft))
    }

    /// Opens an edit draft over a committed event.
    pub fn open_event(&mut self, id: &EventId) -> ServiceResult<EventDraft> {
        let event = self
            .repo
            .get(id)
            .ok_or_else(|| CalendarServiceError::EventNotFound(id.clone()))?;
        Ok(self.open_draft(EventDraft::from_event(event)))
    }

    pub fn pending_draft(&self) -> Option<&EventDraft> {
        self.draft.as_ref()
    }

    /// Closes the open draft without saving.
    pub fn discard_draft(&mut self) -> Option<EventDraft> {
        let discarded = self.draft.take();
        if discarded.is_some() {
            debug!("event=draft_discard module=service status=ok");
        }
        discarded
    }

    /// Validates and commits `draft`. New drafts get an id; edit drafts must
    /// still reference a stored event.
    pub fn save_draft(&mut self, draft: EventDraft) -> ServiceResult<Event> {
        if let Err(err) = draft.validate() {
            warn!(
                "event=draft_save module=service status=invalid issues={}",
                err.issues.len()
            );
            return Err(err.into());
        }

        let is_new = draft.is_new();
        let event = draft.into_event();
        let saved = if is_new {
            self.repo.upsert(event)?
        } else {
            self.repo.update(event)?
        };
        self.draft = None;
        info!(
            "event=draft_save module=service status=ok mode={} id={}",
            if is_new { "create" } else { "update" },
            saved.id
        );
        Ok(saved)
    }

    /// Commits the draft opened by the last create/open command.
    pub fn save_pending_draft(&mut self) -> ServiceResult<Event> {
        let draft = self
            .draft
            .clone()
            .ok_or(CalendarServiceError::NoPendingDraft)?;
        self.save_draft(draft)
    }

    /// Committed events on the draft's start day that overlap its window.
    pub fn draft_conflicts(&self, draft: &EventDraft) -> Vec<Event> {
        let day_events = self.repo.for_day(draft.event.start_date());
        overlapping(&draft.event, &day_events)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Deletes by id. Unknown ids are a no-op.
    pub fn delete_event(&mut self, id: &EventId) {
        self.repo.remove(id);
        if self
            .draft
            .as_ref()
            .is_some_and(|draft| &draft.event.id == id)
        {
            self.draft = None;
        }
        info!("event=event_delete module=service status=ok id={}", id);
    }

    /// Drag-move: re-dates `start`, keeping time-of-day and duration.
    pub fn move_event(&mut self, id: &EventId, target: NaiveDate) -> ServiceResult<Event> {
        let event = self
            .repo
            .get(id)
            .ok_or_else(|| CalendarServiceError::EventNotFound(id.clone()))?;
        if event.is_leave() {
            return Err(CalendarServiceError::LeaveEventLocked(id.clone()));
        }
        let relocated = event
            .moved_to(target)
            .ok_or(LayoutError::DateOutOfRange(target))?;
        let moved = self.repo.update(relocated)?;
        info!(
            "event=event_move module=service status=ok id={} target={}",
            moved.id, target
        );
        Ok(moved)
    }

    /// Month view for the month containing `current_date`.
    pub fn month_view(&self) -> ServiceResult<MonthView> {
        let anchor = self.navigation.current_date();
        self.month_view_for(anchor.year(), anchor.month())
    }

    /// Month view for `(year, month)`, month 1-based.
    pub fn month_view_for(&self, year: i32, month: u32) -> ServiceResult<MonthView> {
        let events = self.repo.all();
        Ok(build_month_view(&self.view_context(), year, month, &events)?)
    }

    pub fn week_view(&self) -> ServiceResult<WeekView> {
        let events = self.repo.all();
        Ok(build_week_view(
            &self.view_context(),
            self.navigation.current_date(),
            &events,
        )?)
    }

    pub fn day_view(&self) -> ServiceResult<DayView> {
        let date = self.navigation.current_date();
        let events = self.repo.for_day(date);
        Ok(build_day_view(&self.view_context(), date, &events)?)
    }

    pub fn year_view(&self) -> ServiceResult<YearView> {
        let year = self.navigation.current_date().year();
        let events = self.repo.all();
        Ok(build_year_view(&self.view_context(), year, &events)?)
    }

    fn view_context(&self) -> ViewContext<'_> {
        ViewContext {
            today: self.today(),
            selected: self.navigation.selected_date(),
            config: &self.config,
            weather: &self.weather,
        }
    }

    fn open_draft(&mut self, draft: EventDraft) -> EventDraft {
        debug!(
            "event=draft_open module=service status=ok mode={}",
            if draft.is_new() { "create" } else { "edit" }
        );
        self.draft = Some(draft.clone());
        draft
    }

    fn draft_defaults(&self, start: NaiveDateTime) -> DraftDefaults {
        DraftDefaults {
            start,
            duration_minutes: self.config.default_event_minutes,
            color: self.config.default_color.clone(),
        }
    }

    /// Selected day at the current local hour.
    fn default_draft_start(&self) -> NaiveDateTime {
        let hour = Local::now().hour();
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        self.navigation.selected_date().and_time(time)
    }
}
