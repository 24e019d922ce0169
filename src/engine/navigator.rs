//! Step navigator
//!
//! Navigation history is an explicit `Vec<StepGroup>` plus a pointer into it.
//! It behaves like a redo stack with eager invalidation:
//!
//! - `go_back` only moves the pointer; forward groups stay for revisiting.
//! - `truncate_forward` discards everything after the pointer. The engine
//!   calls it when a selection changes, since editing an earlier step
//!   invalidates what was decided after it.
//! - `advance` reuses the next group when it is unchanged, so going back and
//!   forward again never duplicates history.
//!
//! ```text
//! [root] -> [barber, styling] -> [barber-cut] -> [specialist-selection]
//!              ^ pointer
//! ```

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::engine::index::OptionIndex;
use crate::engine::selection::SelectedOptions;

/// Step identities presented together as one screen
pub type StepGroup = Vec<String>;

/// Navigation history and current position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepNavigator {
    groups: Vec<StepGroup>,
    current: usize,
}

impl StepNavigator {
    /// Start a history at `[root_step_id]`
    pub fn new(root_step_id: &str) -> Self {
        Self {
            groups: vec![vec![root_step_id.to_string()]],
            current: 0,
        }
    }

    #[inline]
    pub fn groups(&self) -> &[StepGroup] {
        &self.groups
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The group under the pointer
    pub fn current_group(&self) -> &[String] {
        self.groups
            .get(self.current)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when the pointer sits on the last recorded group
    #[inline]
    pub fn is_at_tail(&self) -> bool {
        self.current + 1 >= self.groups.len()
    }

    #[inline]
    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    /// Whether any recorded group contains `step_id`
    pub fn contains_step(&self, step_id: &str) -> bool {
        self.groups
            .iter()
            .any(|group| group.iter().any(|id| id == step_id))
    }

    /// Move the pointer back one group, floored at 0.
    ///
    /// Returns false when already at the first group.
    pub fn go_back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Discard every group after the pointer.
    ///
    /// Returns the number of discarded groups.
    pub fn truncate_forward(&mut self) -> usize {
        let keep = self.current + 1;
        let discarded = self.groups.len().saturating_sub(keep);
        if discarded > 0 {
            self.groups.truncate(keep);
            tracing::debug!(discarded, "Truncated forward navigation history");
        }
        discarded
    }

    /// Move to `next`, recording it after the pointer.
    ///
    /// If the group right after the pointer already equals `next` only the
    /// pointer moves and the rest of the forward history is kept. Otherwise
    /// forward history is replaced by `next`.
    pub fn advance(&mut self, next: StepGroup) {
        let next_index = self.current + 1;
        if self.groups.get(next_index) != Some(&next) {
            self.groups.truncate(next_index);
            self.groups.push(next);
        }
        self.current = next_index;
    }
}

/// Derive the group revealed by the selections made in `group`.
///
/// For each step of the group, in order, and each selected branch option of
/// that step, in selection order, collect its next step. The result is
/// deduplicated keeping first-seen order. Branches pointing at a missing step
/// are skipped with a data-integrity warning.
pub fn derive_next_group(
    group: &[String],
    selections: &SelectedOptions,
    index: &OptionIndex,
    catalog: &Catalog,
) -> StepGroup {
    let mut next: IndexSet<String> = IndexSet::new();

    for step_id in group {
        let Some(selected) = selections.get(step_id) else {
            continue;
        };
        for option_id in selected {
            let Some(next_step) = index.option(option_id).and_then(|o| o.next_step_id()) else {
                continue;
            };
            if !catalog.has_step(next_step) {
                tracing::warn!(
                    option_id = option_id.as_str(),
                    next_step_id = next_step,
                    "Selected branch points at a missing step; treating it as a leaf"
                );
                continue;
            }
            next.insert(next_step.to_string());
        }
    }

    next.into_iter().collect()
}
