//! Selection store
//!
//! The selected-options map is the single source of truth for what the user
//! has chosen. `apply_selection` is a pure transition: it never mutates its
//! input and returns `None` when the event is a no-op.
//!
//! # Rules
//!
//! - **Single** steps: clicking the sole selection clears it, clicking any
//!   other option replaces the selection.
//! - **Multi** steps: clicking toggles membership, other members untouched.
//! - **Cascade**: every branch option removed by the transition invalidates
//!   the selections of all steps reachable through it.
//! - Steps whose selection becomes empty are removed from the map.

use indexmap::{IndexMap, IndexSet};

use crate::catalog::{Catalog, FlowOption};
use crate::types::SelectionMode;

/// Step id -> ordered selected option ids. Never holds an empty list.
pub type SelectedOptions = IndexMap<String, Vec<String>>;

/// Result of a selection that changed state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub selections: SelectedOptions,
    /// Options that were selected before and are not any more (in `step_id`)
    pub removed_options: Vec<String>,
    /// Steps whose selections were dropped by cascade invalidation
    pub invalidated_steps: Vec<String>,
}

/// Apply a click on `option_id` within `step_id`.
///
/// Returns `None` (no-op) when the step is unknown, the option does not
/// belong to the step, or the option is disabled.
pub fn apply_selection(
    catalog: &Catalog,
    selections: &SelectedOptions,
    step_id: &str,
    option_id: &str,
) -> Option<SelectionChange> {
    let Some(step) = catalog.step(step_id) else {
        tracing::debug!(step_id, "Ignoring selection for unknown step");
        return None;
    };

    let Some(option) = step.option(option_id) else {
        tracing::debug!(step_id, option_id, "Ignoring selection of unknown option");
        return None;
    };

    if option.disabled {
        tracing::debug!(step_id, option_id, "Ignoring selection of disabled option");
        return None;
    }

    let previous: &[String] = selections.get(step_id).map(Vec::as_slice).unwrap_or(&[]);

    let next: Vec<String> = match step.selection_mode {
        SelectionMode::Single => {
            if previous.len() == 1 && previous[0] == option_id {
                Vec::new()
            } else {
                vec![option_id.to_string()]
            }
        }
        SelectionMode::Multi => {
            if previous.iter().any(|id| id == option_id) {
                previous.iter().filter(|id| *id != option_id).cloned().collect()
            } else {
                previous.iter().cloned().chain([option_id.to_string()]).collect()
            }
        }
    };

    let removed_options: Vec<String> = previous
        .iter()
        .filter(|id| !next.contains(*id))
        .cloned()
        .collect();

    let mut draft = selections.clone();
    if next.is_empty() {
        draft.shift_remove(step_id);
    } else {
        draft.insert(step_id.to_string(), next);
    }

    let mut invalidated: IndexSet<String> = IndexSet::new();
    for removed_id in &removed_options {
        let Some(next_step) = step.option(removed_id).and_then(FlowOption::next_step_id) else {
            continue;
        };
        for descendant in collect_descendant_steps(catalog, next_step) {
            if draft.shift_remove(&descendant).is_some() {
                invalidated.insert(descendant);
            }
        }
    }

    if !invalidated.is_empty() {
        tracing::debug!(
            step_id,
            option_id,
            invalidated = ?invalidated,
            "Cascade-invalidated descendant selections"
        );
    }

    Some(SelectionChange {
        selections: draft,
        removed_options,
        invalidated_steps: invalidated.into_iter().collect(),
    })
}

/// Every step reachable from `start_step_id` (inclusive) by following
/// enabled branch options, in discovery order.
///
/// A start step missing from the catalog yields nothing. Cycles are safe.
pub fn collect_descendant_steps(catalog: &Catalog, start_step_id: &str) -> Vec<String> {
    if !catalog.has_step(start_step_id) {
        tracing::warn!(
            step_id = start_step_id,
            "Branch points at a missing step; treating it as a leaf"
        );
        return Vec::new();
    }

    let mut seen: IndexSet<String> = IndexSet::new();
    let mut pending: Vec<&str> = vec![start_step_id];

    while let Some(step_id) = pending.pop() {
        let Some(step) = catalog.step(step_id) else {
            continue;
        };
        if !seen.insert(step.id.clone()) {
            continue;
        }
        // Push in reverse so discovery follows option order
        pending.extend(
            step.options
                .iter()
                .rev()
                .filter(|option| !option.disabled)
                .filter_map(FlowOption::next_step_id)
                .filter(|next| catalog.has_step(next)),
        );
    }

    seen.into_iter().collect()
}
