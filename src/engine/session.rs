//! Booking session engine
//!
//! `FlowEngine::apply(state, event)` is the single transition function of a
//! booking session. It never mutates its input: every event produces a new
//! `FlowState` (or reports that nothing changed) plus, on the terminal
//! forward, a `ConfirmationPayload`.
//!
//! # Design
//!
//! - **Explicit state**: selections, navigation history, assignments,
//!   schedule and contact details live in one plain value
//! - **Silent no-ops**: unknown steps, disabled options, out-of-roster
//!   specialists and similar user-input edge cases leave state untouched
//! - **Reconciliation**: after every event, derived state is brought back in
//!   line (assignment pruning, scheduling reset). Reconciling twice is the
//!   same as reconciling once
//!
//! # Special steps
//!
//! Enabled capabilities become sentinel steps appended once the catalog steps
//! are exhausted, one per group, in the order assignment, scheduling, contact.
//! The group holding the last enabled special step is terminal. Without
//! capabilities, a group is terminal when it reveals nothing further.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::BookingConfig;
use crate::confirmation::{AppointmentDetails, Assignees, ConfirmationPayload};
use crate::contact::ContactDetails;
use crate::engine::index::OptionIndex;
use crate::engine::navigator::{StepGroup, StepNavigator, derive_next_group};
use crate::engine::selection::{SelectedOptions, apply_selection};
use crate::error::Result;
use crate::logic::resolver::{Assignments, SHARED_CATEGORY, prune_assignments, resolve_for_mode};
use crate::logic::summary::{BookingSummary, summarize};
use crate::scheduling::Schedule;
use crate::types::{AssignmentMode, ContactField, RecurrenceFrequency, SpecialStep};

// ============================================================================
// Events & State
// ============================================================================

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FlowEvent {
    /// Click an option of a catalog step
    Select { step_id: String, option_id: String },
    /// Toggle the specialist assigned to a category
    Assign {
        category_id: String,
        specialist_id: String,
    },
    SetDate { date: Option<NaiveDate> },
    ToggleTimeSlot { time: NaiveTime },
    SetRecurrence {
        frequency: Option<RecurrenceFrequency>,
    },
    SetWaitlist { enabled: bool },
    UpdateContact { field: ContactField, value: String },
    Back,
    Forward,
    Reset,
}

/// Everything a session has decided so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowState {
    pub selections: SelectedOptions,
    pub navigator: StepNavigator,
    pub assignments: Assignments,
    pub schedule: Schedule,
    pub contact: ContactDetails,
}

impl FlowState {
    /// Fresh state positioned at the root group
    pub fn new(root_step_id: &str) -> Self {
        Self {
            selections: SelectedOptions::new(),
            navigator: StepNavigator::new(root_step_id),
            assignments: Assignments::new(),
            schedule: Schedule::default(),
            contact: ContactDetails::default(),
        }
    }

    /// Selected option ids of one step
    pub fn selected(&self, step_id: &str) -> &[String] {
        self.selections
            .get(step_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// What a forward event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Moved to the next group
    Advanced,
    /// The current group is not satisfied yet
    Blocked,
    /// The terminal group was confirmed
    Confirmed,
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: FlowState,
    /// Present only when a forward on the terminal group confirmed
    pub confirmation: Option<ConfirmationPayload>,
    /// Whether `state` differs from the input state
    pub changed: bool,
}

impl Transition {
    fn unchanged(state: &FlowState) -> Self {
        Self {
            state: state.clone(),
            confirmation: None,
            changed: false,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Immutable context of a booking session: catalog, index and settings
#[derive(Debug, Clone)]
pub struct FlowEngine {
    catalog: Catalog,
    index: OptionIndex,
    config: BookingConfig,
    today: NaiveDate,
}

impl FlowEngine {
    /// Validate the catalog and build its option index.
    ///
    /// Data-integrity warnings are logged; structural defects and duplicate
    /// option ids are errors.
    pub fn new(catalog: Catalog, config: BookingConfig) -> Result<Self> {
        let warnings = catalog.validate()?;
        for warning in &warnings {
            tracing::warn!(%warning, "Catalog data-integrity issue");
        }
        let index = OptionIndex::build(&catalog)?;

        tracing::info!(
            root = catalog.root_step_id.as_str(),
            steps = catalog.steps.len(),
            options = index.len(),
            "Booking flow engine ready"
        );

        Ok(Self {
            catalog,
            index,
            config,
            today: chrono::Local::now().date_naive(),
        })
    }

    /// Pin "today" used for date validation
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn index(&self) -> &OptionIndex {
        &self.index
    }

    #[inline]
    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    #[inline]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn initial_state(&self) -> FlowState {
        FlowState::new(&self.catalog.root_step_id)
    }

    /// Apply one event to `state`
    pub fn apply(&self, state: &FlowState, event: &FlowEvent) -> Transition {
        let mut next = state.clone();

        match event {
            FlowEvent::Select { step_id, option_id } => {
                if !self.select(&mut next, step_id, option_id) {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::Assign {
                category_id,
                specialist_id,
            } => {
                if !self.assign(&mut next, category_id, specialist_id) {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::SetDate { date } => {
                if !self.catalog.capabilities.scheduling
                    || !next.schedule.set_date(*date, self.today, &self.config.scheduling)
                {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::ToggleTimeSlot { time } => {
                if !self.catalog.capabilities.scheduling
                    || !next.schedule.toggle_time(*time, &self.config.scheduling)
                {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::SetRecurrence { frequency } => {
                if !self.catalog.capabilities.scheduling || !next.schedule.set_recurrence(*frequency)
                {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::SetWaitlist { enabled } => {
                if !self.catalog.capabilities.scheduling || !next.schedule.set_waitlist(*enabled) {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::UpdateContact { field, value } => {
                if !self.catalog.capabilities.contact || !next.contact.update(*field, value) {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::Back => {
                if !next.navigator.go_back() {
                    return Transition::unchanged(state);
                }
            }
            FlowEvent::Forward => match self.forward(&mut next) {
                ForwardOutcome::Blocked => {
                    tracing::debug!(
                        group = ?state.navigator.current_group(),
                        "Forward blocked; current group is not satisfied"
                    );
                    return Transition::unchanged(state);
                }
                ForwardOutcome::Confirmed => {
                    tracing::info!("Booking confirmed");
                    return Transition {
                        state: state.clone(),
                        confirmation: Some(self.confirmation(state)),
                        changed: false,
                    };
                }
                ForwardOutcome::Advanced => {}
            },
            FlowEvent::Reset => {
                next = self.initial_state();
            }
        }

        self.reconcile(&mut next);
        let changed = next != *state;

        Transition {
            state: next,
            confirmation: None,
            changed,
        }
    }

    /// Outcome a forward event would have from `state`
    pub fn forward_outcome(&self, state: &FlowState) -> ForwardOutcome {
        let mut scratch = state.clone();
        self.forward(&mut scratch)
    }

    fn select(&self, state: &mut FlowState, step_id: &str, option_id: &str) -> bool {
        if SpecialStep::from_step_id(step_id).is_some() {
            tracing::debug!(step_id, "Ignoring option selection on a built-in step");
            return false;
        }

        let Some(change) = apply_selection(&self.catalog, &state.selections, step_id, option_id)
        else {
            return false;
        };

        state.selections = change.selections;
        state.navigator.truncate_forward();
        if !state.assignments.is_empty() {
            tracing::debug!("Selection changed; clearing specialist assignments");
            state.assignments.clear();
        }
        true
    }

    fn assign(&self, state: &mut FlowState, category_id: &str, specialist_id: &str) -> bool {
        let Some(mode) = self.catalog.capabilities.assignment else {
            tracing::debug!("Ignoring assignment; catalog has no assignment step");
            return false;
        };

        if !self.categories(state).iter().any(|c| c == category_id) {
            tracing::debug!(category_id, "Ignoring assignment for a category not selected");
            return false;
        }

        let roster_key = match mode {
            AssignmentMode::PerCategory => category_id,
            AssignmentMode::Single => SHARED_CATEGORY,
        };
        if self.catalog.specialist(roster_key, specialist_id).is_none() {
            tracing::debug!(category_id, specialist_id, "Ignoring unknown specialist");
            return false;
        }

        if state.assignments.get(category_id).map(String::as_str) == Some(specialist_id) {
            state.assignments.shift_remove(category_id);
        } else {
            state
                .assignments
                .insert(category_id.to_string(), specialist_id.to_string());
        }
        true
    }

    fn forward(&self, state: &mut FlowState) -> ForwardOutcome {
        if !self.can_continue(state) {
            return ForwardOutcome::Blocked;
        }
        let next = self.next_group(state);
        if next.is_empty() {
            return ForwardOutcome::Confirmed;
        }
        state.navigator.advance(next);
        ForwardOutcome::Advanced
    }

    /// Bring derived state back in line with the selections and history
    fn reconcile(&self, state: &mut FlowState) {
        let categories = self.categories(state);
        let pruned = match prune_assignments(&state.assignments, &categories) {
            Cow::Borrowed(_) => None,
            Cow::Owned(map) => Some(map),
        };
        if let Some(map) = pruned {
            state.assignments = map;
        }

        let scheduling_step = SpecialStep::Scheduling.step_id();
        if !state.schedule.is_empty() && !state.navigator.contains_step(scheduling_step) {
            tracing::debug!("Scheduling step left the history; resetting schedule");
            state.schedule = Schedule::default();
        }
        state.schedule.normalize();
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Categories needing an assignee for the current selections
    pub fn categories(&self, state: &FlowState) -> Vec<String> {
        match self.catalog.capabilities.assignment {
            Some(mode) => resolve_for_mode(mode, &state.selections, &self.index),
            None => Vec::new(),
        }
    }

    pub fn summary(&self, state: &FlowState) -> BookingSummary {
        summarize(&state.selections, &self.catalog, &self.index)
    }

    /// Whether every step of the current group is satisfied
    pub fn can_continue(&self, state: &FlowState) -> bool {
        let group = state.navigator.current_group();
        !group.is_empty() && group.iter().all(|step_id| self.is_step_satisfied(state, step_id))
    }

    fn is_step_satisfied(&self, state: &FlowState, step_id: &str) -> bool {
        match SpecialStep::from_step_id(step_id) {
            Some(SpecialStep::Assignment) => {
                let categories = self.categories(state);
                !self.summary(state).is_empty()
                    && categories
                        .iter()
                        .all(|category| state.assignments.contains_key(category))
            }
            Some(SpecialStep::Scheduling) => state.schedule.is_complete(),
            Some(SpecialStep::Contact) => state.contact.is_complete(),
            None => match self.catalog.step(step_id) {
                Some(step) => step.selection_mode.is_satisfied_by(state.selected(step_id).len()),
                None => false,
            },
        }
    }

    /// The group a forward from the current group would reveal.
    ///
    /// Empty when the current group is terminal.
    pub fn next_group(&self, state: &FlowState) -> StepGroup {
        let group = state.navigator.current_group();
        let specials = self.catalog.capabilities.special_steps();

        let current_special = group
            .iter()
            .find_map(|step_id| SpecialStep::from_step_id(step_id));
        if let Some(current) = current_special {
            return specials
                .into_iter()
                .find(|special| *special > current)
                .map(|special| vec![special.step_id().to_string()])
                .unwrap_or_default();
        }

        let derived = derive_next_group(group, &state.selections, &self.index, &self.catalog);
        if !derived.is_empty() {
            return derived;
        }
        specials
            .first()
            .map(|special| vec![special.step_id().to_string()])
            .unwrap_or_default()
    }

    /// Whether a forward from the current group would confirm the booking.
    ///
    /// An unsatisfied group is never terminal, even when it reveals nothing.
    pub fn is_terminal(&self, state: &FlowState) -> bool {
        self.can_continue(state) && self.next_group(state).is_empty()
    }

    /// Build the payload for the current state
    pub fn confirmation(&self, state: &FlowState) -> ConfirmationPayload {
        let capabilities = &self.catalog.capabilities;
        let mut payload = ConfirmationPayload::from_summary(self.summary(state));

        payload.assignees = capabilities.assignment.map(|mode| match mode {
            AssignmentMode::PerCategory => Assignees::PerCategory(state.assignments.clone()),
            AssignmentMode::Single => Assignees::Single(
                state
                    .assignments
                    .get(SHARED_CATEGORY)
                    .cloned()
                    .unwrap_or_default(),
            ),
        });

        if capabilities.scheduling {
            if let (Some(date), Some(time)) = (state.schedule.date, state.schedule.time) {
                payload.appointment = Some(AppointmentDetails::new(
                    date,
                    time,
                    state.schedule.recurrence,
                    state.schedule.waitlist,
                ));
            }
        }

        if capabilities.contact {
            payload.customer = Some(state.contact.to_customer());
        }

        payload
    }
}

// ============================================================================
// Session wrapper
// ============================================================================

/// Owns one session's state and dispatches events through an engine
#[derive(Debug, Clone)]
pub struct FlowSession<'e> {
    engine: &'e FlowEngine,
    state: FlowState,
}

impl<'e> FlowSession<'e> {
    pub fn new(engine: &'e FlowEngine) -> Self {
        Self {
            engine,
            state: engine.initial_state(),
        }
    }

    #[inline]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    #[inline]
    pub fn engine(&self) -> &FlowEngine {
        self.engine
    }

    /// Apply `event`, returning the payload on a confirming forward
    pub fn dispatch(&mut self, event: FlowEvent) -> Option<ConfirmationPayload> {
        let transition = self.engine.apply(&self.state, &event);
        self.state = transition.state;
        transition.confirmation
    }

    pub fn summary(&self) -> BookingSummary {
        self.engine.summary(&self.state)
    }

    pub fn can_continue(&self) -> bool {
        self.engine.can_continue(&self.state)
    }

    pub fn current_group(&self) -> &[String] {
        self.state.navigator.current_group()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Capabilities, FlowOption, Specialist, SpecialistRoster, Step};
    use crate::types::SelectionMode;
    use rust_decimal_macros::dec;

    fn roster(ids: &[&str]) -> SpecialistRoster {
        SpecialistRoster {
            label: "Team".to_string(),
            specialists: ids
                .iter()
                .map(|id| Specialist {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    rating: 4.5,
                    first_available: None,
                })
                .collect(),
        }
    }

    fn catalog(capabilities: Capabilities) -> Catalog {
        Catalog::new(
            "root",
            [
                Step::new("root", "Services", SelectionMode::Multi)
                    .with_option(FlowOption::branch("to-cuts", "Cuts", "cuts"))
                    .with_option(FlowOption::branch("to-color", "Color", "color")),
                Step::new("cuts", "Cuts", SelectionMode::Single)
                    .with_option(FlowOption::leaf("cut", "Cut", dec!(70), 30).in_category("hair")),
                Step::new("color", "Color", SelectionMode::Single)
                    .with_option(FlowOption::leaf("dye", "Dye", dec!(180), 60).in_category("color")),
            ],
        )
        .with_capabilities(capabilities)
        .with_roster("hair", roster(&["ana", "ioana"]))
        .with_roster("color", roster(&["maria"]))
        .with_roster(SHARED_CATEGORY, roster(&["ana", "maria"]))
    }

    fn engine(capabilities: Capabilities) -> FlowEngine {
        FlowEngine::new(catalog(capabilities), BookingConfig::default())
            .unwrap()
            .with_today(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
    }

    fn select(step: &str, option: &str) -> FlowEvent {
        FlowEvent::Select {
            step_id: step.to_string(),
            option_id: option.to_string(),
        }
    }

    fn assign(category: &str, specialist: &str) -> FlowEvent {
        FlowEvent::Assign {
            category_id: category.to_string(),
            specialist_id: specialist.to_string(),
        }
    }

    fn per_category() -> Capabilities {
        Capabilities {
            assignment: Some(AssignmentMode::PerCategory),
            scheduling: false,
            contact: false,
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[test]
    fn test_forward_blocked_until_satisfied() {
        let engine = engine(Capabilities::default());
        let mut session = FlowSession::new(&engine);
        assert!(!session.can_continue());
        assert!(session.dispatch(FlowEvent::Forward).is_none());
        assert_eq!(session.state().navigator.current_index(), 0);
    }

    #[test]
    fn test_plain_catalog_confirms_when_nothing_follows() {
        let engine = engine(Capabilities::default());
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        assert!(session.dispatch(FlowEvent::Forward).is_none());
        assert_eq!(session.current_group(), ["cuts".to_string()]);

        session.dispatch(select("cuts", "cut"));
        let payload = session.dispatch(FlowEvent::Forward).expect("terminal forward confirms");
        assert_eq!(payload.total_price, dec!(70));
        assert!(payload.assignees.is_none());

        // Idle until reset: forwarding again re-emits without moving
        let again = session.dispatch(FlowEvent::Forward).expect("re-emitted");
        assert_eq!(again, payload);
        assert_eq!(session.state().navigator.current_index(), 1);
    }

    #[test]
    fn test_special_steps_follow_catalog_steps() {
        let engine = engine(Capabilities {
            assignment: Some(AssignmentMode::PerCategory),
            scheduling: true,
            contact: true,
        });
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(select("cuts", "cut"));
        session.dispatch(FlowEvent::Forward);
        assert_eq!(
            session.current_group(),
            [SpecialStep::Assignment.step_id().to_string()]
        );

        session.dispatch(assign("hair", "ana"));
        session.dispatch(FlowEvent::Forward);
        assert_eq!(
            session.current_group(),
            [SpecialStep::Scheduling.step_id().to_string()]
        );
        assert!(!engine.is_terminal(session.state()));
    }

    #[test]
    fn test_select_truncates_forward_history_and_clears_assignments() {
        let engine = engine(per_category());
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(select("cuts", "cut"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(assign("hair", "ana"));
        assert_eq!(session.state().assignments.len(), 1);

        session.dispatch(FlowEvent::Back);
        session.dispatch(FlowEvent::Back);
        assert_eq!(session.state().navigator.groups().len(), 3);

        session.dispatch(select("root", "to-color"));
        assert_eq!(session.state().navigator.groups().len(), 1);
        assert!(session.state().assignments.is_empty());
    }

    #[test]
    fn test_back_then_forward_reuses_history() {
        let engine = engine(Capabilities::default());
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(FlowEvent::Back);
        session.dispatch(FlowEvent::Forward);
        assert_eq!(session.state().navigator.groups().len(), 2);
        assert_eq!(session.state().navigator.current_index(), 1);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let engine = engine(Capabilities::default());
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(FlowEvent::Reset);
        assert_eq!(session.state(), &engine.initial_state());
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    #[test]
    fn test_assign_toggles_and_validates() {
        let engine = engine(per_category());
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(select("cuts", "cut"));

        // Category not selected
        session.dispatch(assign("color", "maria"));
        assert!(session.state().assignments.is_empty());
        // Specialist not on the roster
        session.dispatch(assign("hair", "maria"));
        assert!(session.state().assignments.is_empty());

        session.dispatch(assign("hair", "ana"));
        assert_eq!(session.state().assignments["hair"], "ana");
        session.dispatch(assign("hair", "ana"));
        assert!(session.state().assignments.is_empty());
    }

    #[test]
    fn test_assign_without_capability_is_noop() {
        let engine = engine(Capabilities::default());
        let state = engine.initial_state();
        let transition = engine.apply(&state, &assign("hair", "ana"));
        assert!(!transition.changed);
    }

    #[test]
    fn test_single_assignment_mode() {
        let engine = engine(Capabilities {
            assignment: Some(AssignmentMode::Single),
            scheduling: false,
            contact: false,
        });
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(select("cuts", "cut"));
        session.dispatch(FlowEvent::Forward);
        assert!(!session.can_continue());

        session.dispatch(assign(SHARED_CATEGORY, "maria"));
        assert!(session.can_continue());
        let payload = session.dispatch(FlowEvent::Forward).unwrap();
        assert_eq!(payload.assignees, Some(Assignees::Single("maria".to_string())));
    }

    #[test]
    fn test_assignment_step_with_no_categories_needs_services() {
        let engine = engine(per_category());
        let state = engine.initial_state();
        let mut on_assignment = state.clone();
        on_assignment
            .navigator
            .advance(vec![SpecialStep::Assignment.step_id().to_string()]);
        assert!(!engine.can_continue(&on_assignment));
    }

    // ========================================================================
    // Scheduling & contact
    // ========================================================================

    #[test]
    fn test_scheduling_events_need_capability() {
        let engine = engine(Capabilities::default());
        let state = engine.initial_state();
        let event = FlowEvent::SetDate {
            date: NaiveDate::from_ymd_opt(2026, 3, 12),
        };
        assert!(!engine.apply(&state, &event).changed);
    }

    #[test]
    fn test_schedule_resets_when_step_leaves_history() {
        let engine = engine(Capabilities {
            assignment: None,
            scheduling: true,
            contact: true,
        });
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-cuts"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(select("cuts", "cut"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(FlowEvent::SetDate {
            date: NaiveDate::from_ymd_opt(2026, 3, 12),
        });
        assert!(!session.state().schedule.is_empty());

        session.dispatch(FlowEvent::Back);
        // Still in forward history
        assert!(!session.state().schedule.is_empty());

        session.dispatch(select("cuts", "cut"));
        assert!(session.state().schedule.is_empty());
    }

    #[test]
    fn test_contact_completes_confirmation() {
        let engine = engine(Capabilities {
            assignment: None,
            scheduling: false,
            contact: true,
        });
        let mut session = FlowSession::new(&engine);
        session.dispatch(select("root", "to-color"));
        session.dispatch(FlowEvent::Forward);
        session.dispatch(select("color", "dye"));
        session.dispatch(FlowEvent::Forward);
        assert!(session.dispatch(FlowEvent::Forward).is_none());

        for (field, value) in [(ContactField::Name, "Ana"), (ContactField::Phone, "0722")] {
            session.dispatch(FlowEvent::UpdateContact {
                field,
                value: value.to_string(),
            });
        }
        let payload = session.dispatch(FlowEvent::Forward).unwrap();
        let customer = payload.customer.unwrap();
        assert_eq!(customer.name, "Ana");
        assert_eq!(customer.email, None);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let engine = engine(per_category());
        let mut state = engine.initial_state();
        state.assignments.insert("hair".to_string(), "ana".to_string());
        engine.reconcile(&mut state);
        let once = state.clone();
        engine.reconcile(&mut state);
        assert_eq!(state, once);
        assert!(state.assignments.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event: FlowEvent =
            serde_json::from_str(r#"{"event": "select", "step_id": "root", "option_id": "to-cuts"}"#)
                .unwrap();
        assert_eq!(event, select("root", "to-cuts"));

        let event: FlowEvent = serde_json::from_str(r#"{"event": "forward"}"#).unwrap();
        assert_eq!(event, FlowEvent::Forward);

        let event: FlowEvent =
            serde_json::from_str(r#"{"event": "toggle_time_slot", "time": "14:00:00"}"#).unwrap();
        assert!(matches!(event, FlowEvent::ToggleTimeSlot { .. }));
    }
}
