//! Category Resolver
//!
//! Translates the current leaf selections into the secondary-assignment
//! categories they imply, and prunes stale assignments when that set changes.
//!
//! # Design
//!
//! - **Pure logic**: No I/O, no side effects; only resolves identities
//! - **Deterministic order**: Categories come out in first-seen order over one
//!   pass of the selection map
//! - **Referential stability**: `prune_assignments` hands back the caller's own
//!   map (`Cow::Borrowed`) when nothing would change, so consumers can compare
//!   by identity and skip recomputation
//!
//! # Resolution Rules
//!
//! | Assignment mode | Resolved To |
//! |-----------------|-------------|
//! | `per_category`  | `category_id` of every selected leaf, deduplicated |
//! | `single`        | `[SHARED_CATEGORY]` once any leaf is selected |

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};

use crate::engine::index::OptionIndex;
use crate::engine::selection::SelectedOptions;
use crate::types::AssignmentMode;

/// Category key used when a single assignee covers the whole booking
pub const SHARED_CATEGORY: &str = "all-services";

/// Category id -> assignee id
pub type Assignments = IndexMap<String, String>;

// ============================================================================
// Category Resolution
// ============================================================================

/// Categories implied by the currently selected leaf options.
///
/// Branch options and leaves without a category contribute nothing. Options
/// missing from the index are skipped.
pub fn resolve_categories(selections: &SelectedOptions, index: &OptionIndex) -> Vec<String> {
    let mut categories: IndexSet<&str> = IndexSet::new();

    for option_id in selections.values().flatten() {
        if let Some(category) = index.option(option_id).and_then(|o| o.category_id()) {
            categories.insert(category);
        }
    }

    categories.into_iter().map(str::to_string).collect()
}

/// Categories for the given assignment mode.
///
/// `Single` mode needs one assignee as soon as any leaf is selected.
pub fn resolve_for_mode(
    mode: AssignmentMode,
    selections: &SelectedOptions,
    index: &OptionIndex,
) -> Vec<String> {
    match mode {
        AssignmentMode::PerCategory => resolve_categories(selections, index),
        AssignmentMode::Single => {
            let any_leaf = selections
                .values()
                .flatten()
                .any(|option_id| index.option(option_id).is_some_and(|o| o.is_leaf()));
            if any_leaf {
                vec![SHARED_CATEGORY.to_string()]
            } else {
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Pruning
// ============================================================================

/// Keep only assignments for categories still present.
///
/// Returns `Cow::Borrowed(previous)` when every assigned category is still
/// implied, i.e. the pruned map would equal the previous one in keys and
/// values.
pub fn prune_assignments<'a>(
    previous: &'a Assignments,
    categories: &[String],
) -> Cow<'a, Assignments> {
    let is_live = |category: &String| categories.iter().any(|c| c == category);

    if previous.keys().all(is_live) {
        return Cow::Borrowed(previous);
    }

    let pruned: Assignments = previous
        .iter()
        .filter(|(category, _)| is_live(category))
        .map(|(category, assignee)| (category.clone(), assignee.clone()))
        .collect();

    tracing::debug!(
        dropped = previous.len() - pruned.len(),
        "Pruned assignments for categories no longer selected"
    );

    Cow::Owned(pruned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FlowOption, Step};
    use crate::types::SelectionMode;
    use rust_decimal_macros::dec;

    fn index() -> OptionIndex {
        let catalog = Catalog::new(
            "root",
            [
                Step::new("root", "Root", SelectionMode::Multi)
                    .with_option(FlowOption::branch("to-cuts", "Cuts", "cuts"))
                    .with_option(FlowOption::branch("to-color", "Color", "color")),
                Step::new("cuts", "Cuts", SelectionMode::Multi)
                    .with_option(FlowOption::leaf("short", "Short", dec!(70), 30).in_category("hair"))
                    .with_option(FlowOption::leaf("beard", "Beard", dec!(50), 20).in_category("barber"))
                    .with_option(FlowOption::leaf("wash", "Wash", dec!(20), 10)),
                Step::new("color", "Color", SelectionMode::Single)
                    .with_option(FlowOption::leaf("dye", "Dye", dec!(180), 60).in_category("hair")),
            ],
        );
        OptionIndex::build(&catalog).unwrap()
    }

    fn selections(entries: &[(&str, &[&str])]) -> SelectedOptions {
        entries
            .iter()
            .map(|(step, options)| {
                (step.to_string(), options.iter().map(|o| o.to_string()).collect())
            })
            .collect()
    }

    fn assignments(entries: &[(&str, &str)]) -> Assignments {
        entries
            .iter()
            .map(|(c, a)| (c.to_string(), a.to_string()))
            .collect()
    }

    // ========================================================================
    // Resolution Tests
    // ========================================================================

    #[test]
    fn test_resolve_dedups_in_first_seen_order() {
        let s = selections(&[
            ("root", &["to-cuts", "to-color"]),
            ("cuts", &["beard", "short", "wash"]),
            ("color", &["dye"]),
        ]);
        assert_eq!(resolve_categories(&s, &index()), vec!["barber", "hair"]);
    }

    #[test]
    fn test_resolve_ignores_branches_and_uncategorized() {
        let s = selections(&[("root", &["to-cuts"]), ("cuts", &["wash"])]);
        assert!(resolve_categories(&s, &index()).is_empty());
    }

    #[test]
    fn test_resolve_single_mode() {
        let index = index();
        let branches_only = selections(&[("root", &["to-cuts"])]);
        assert!(resolve_for_mode(AssignmentMode::Single, &branches_only, &index).is_empty());

        let with_leaf = selections(&[("root", &["to-cuts"]), ("cuts", &["wash"])]);
        assert_eq!(
            resolve_for_mode(AssignmentMode::Single, &with_leaf, &index),
            vec![SHARED_CATEGORY]
        );
    }

    // ========================================================================
    // Pruning Tests
    // ========================================================================

    #[test]
    fn test_prune_unchanged_returns_same_instance() {
        let previous = assignments(&[("hair", "ana")]);
        let categories = vec!["hair".to_string(), "barber".to_string()];

        let pruned = prune_assignments(&previous, &categories);
        assert!(matches!(pruned, Cow::Borrowed(_)));
        assert!(std::ptr::eq(pruned.as_ref(), &previous));
    }

    #[test]
    fn test_prune_empty_map_is_stable() {
        let previous = Assignments::new();
        assert!(matches!(prune_assignments(&previous, &[]), Cow::Borrowed(_)));
    }

    #[test]
    fn test_prune_drops_stale_categories() {
        let previous = assignments(&[("hair", "ana"), ("barber", "mihai")]);
        let categories = vec!["barber".to_string()];

        let pruned = prune_assignments(&previous, &categories);
        assert!(matches!(pruned, Cow::Owned(_)));
        assert_eq!(pruned.into_owned(), assignments(&[("barber", "mihai")]));
    }
}
