//! Property-Based Tests for the booking flow
//!
//! Uses proptest for invariants of the selection, navigation and resolver
//! layers:
//! - Single/multi selection semantics against a simple model
//! - Cascade invalidation only touches descendants
//! - Next-group derivation never duplicates steps
//! - Assignment pruning keeps the same map when nothing is dropped
//! - Back/forward revisits never grow the history

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use proptest::prelude::*;
use rust_decimal::Decimal;

use booking_flow::{
    BookingConfig, Catalog, FlowEngine, FlowEvent, FlowOption, FlowSession, OptionIndex,
    SelectedOptions, SelectionMode, Step, apply_selection, derive_next_group, prune_assignments,
};

const OPTIONS: usize = 5;

fn option_id(i: usize) -> String {
    format!("opt-{i}")
}

/// One step with `OPTIONS` leaf options
fn flat_catalog(mode: SelectionMode) -> Catalog {
    let step = (0..OPTIONS).fold(Step::new("root", "Root", mode), |step, i| {
        step.with_option(FlowOption::leaf(&option_id(i), "Leaf", Decimal::from(10), 15))
    });
    Catalog::new("root", [step])
}

/// Root with one branch per target; targets may repeat
fn fan_out_catalog(targets: &[usize]) -> Catalog {
    let mut steps = vec![targets.iter().enumerate().fold(
        Step::new("root", "Root", SelectionMode::Multi),
        |step, (i, target)| {
            step.with_option(FlowOption::branch(
                &format!("branch-{i}"),
                "Branch",
                &format!("step-{target}"),
            ))
        },
    )];
    let distinct: IndexSet<usize> = targets.iter().copied().collect();
    for target in distinct {
        steps.push(
            Step::new(&format!("step-{target}"), "Target", SelectionMode::Single).with_option(
                FlowOption::leaf(&format!("leaf-{target}"), "Leaf", Decimal::from(5), 10),
            ),
        );
    }
    Catalog::new("root", steps)
}

/// root -> a -> a2 and root -> b, each ending in one leaf
fn chain_catalog() -> Catalog {
    Catalog::new(
        "root",
        [
            Step::new("root", "Root", SelectionMode::Multi)
                .with_option(FlowOption::branch("a", "A", "a"))
                .with_option(FlowOption::branch("b", "B", "b")),
            Step::new("a", "A", SelectionMode::Single)
                .with_option(FlowOption::branch("a-deeper", "Deeper", "a2"))
                .with_option(FlowOption::leaf("a-leaf", "A leaf", Decimal::from(1), 1)),
            Step::new("a2", "A2", SelectionMode::Single)
                .with_option(FlowOption::leaf("a2-leaf", "A2 leaf", Decimal::from(2), 2)),
            Step::new("b", "B", SelectionMode::Single)
                .with_option(FlowOption::leaf("b-leaf", "B leaf", Decimal::from(3), 3)),
        ],
    )
}

fn click(catalog: &Catalog, selections: &SelectedOptions, option: usize) -> SelectedOptions {
    apply_selection(catalog, selections, "root", &option_id(option))
        .map(|change| change.selections)
        .unwrap_or_else(|| selections.clone())
}

// =============================================================================
// Selection
// =============================================================================

proptest! {
    /// Single mode: a click on the current option clears, any other click replaces
    #[test]
    fn single_mode_matches_model(clicks in prop::collection::vec(0..OPTIONS, 1..30)) {
        let catalog = flat_catalog(SelectionMode::Single);
        let mut selections = SelectedOptions::new();
        let mut model: Option<usize> = None;

        for option in clicks {
            selections = click(&catalog, &selections, option);
            model = if model == Some(option) { None } else { Some(option) };

            let expected: Vec<String> = model.map(option_id).into_iter().collect();
            let actual = selections.get("root").cloned().unwrap_or_default();
            prop_assert_eq!(actual, expected);
        }
    }

    /// Multi mode: every click toggles exactly one member
    #[test]
    fn multi_mode_matches_model(clicks in prop::collection::vec(0..OPTIONS, 1..30)) {
        let catalog = flat_catalog(SelectionMode::Multi);
        let mut selections = SelectedOptions::new();
        let mut model: IndexSet<usize> = IndexSet::new();

        for option in clicks {
            selections = click(&catalog, &selections, option);
            if !model.shift_remove(&option) {
                model.insert(option);
            }

            let mut expected: Vec<String> = model.iter().copied().map(option_id).collect();
            let mut actual = selections.get("root").cloned().unwrap_or_default();
            expected.sort();
            actual.sort();
            prop_assert_eq!(actual, expected);
            prop_assert!(selections.values().all(|selected| !selected.is_empty()));
        }
    }

    /// Dropping branch "a" removes a and a2, never b
    #[test]
    fn cascade_only_touches_descendants(deeper in any::<bool>(), pick_b in any::<bool>()) {
        let catalog = chain_catalog();
        let mut selections = SelectedOptions::new();
        let steps = [
            Some(("root", "a")),
            Some(("a", if deeper { "a-deeper" } else { "a-leaf" })),
            deeper.then_some(("a2", "a2-leaf")),
            pick_b.then_some(("root", "b")),
            pick_b.then_some(("b", "b-leaf")),
        ];
        for (step_id, option) in steps.into_iter().flatten() {
            selections = apply_selection(&catalog, &selections, step_id, option)
                .unwrap()
                .selections;
        }

        let change = apply_selection(&catalog, &selections, "root", "a").unwrap();
        prop_assert!(!change.selections.contains_key("a"));
        prop_assert!(!change.selections.contains_key("a2"));
        prop_assert_eq!(change.selections.contains_key("b"), pick_b);
        prop_assert_eq!(change.removed_options, vec!["a".to_string()]);
    }
}

// =============================================================================
// Navigation
// =============================================================================

proptest! {
    /// The next group is the distinct targets of selected branches, first-seen order
    #[test]
    fn derive_next_is_distinct_and_ordered(
        targets in prop::collection::vec(0..4usize, 1..8),
        picks in prop::collection::vec(any::<bool>(), 8),
    ) {
        let catalog = fan_out_catalog(&targets);
        let index = OptionIndex::build(&catalog).unwrap();

        let mut selections = SelectedOptions::new();
        let mut expected: IndexSet<String> = IndexSet::new();
        for (i, target) in targets.iter().enumerate() {
            if picks[i] {
                selections = apply_selection(&catalog, &selections, "root", &format!("branch-{i}"))
                    .unwrap()
                    .selections;
                expected.insert(format!("step-{target}"));
            }
        }

        let next = derive_next_group(&["root".to_string()], &selections, &index, &catalog);
        let distinct: IndexSet<&String> = next.iter().collect();
        prop_assert_eq!(distinct.len(), next.len());
        prop_assert_eq!(next, expected.into_iter().collect::<Vec<_>>());
    }

    /// Back/forward without selection changes never grows the history
    #[test]
    fn revisiting_keeps_history(moves in prop::collection::vec(any::<bool>(), 0..40)) {
        let engine = FlowEngine::new(chain_catalog(), BookingConfig::default()).unwrap();
        let mut session = FlowSession::new(&engine);
        for (step_id, option) in [("root", "a"), ("root", "b")] {
            session.dispatch(FlowEvent::Select {
                step_id: step_id.to_string(),
                option_id: option.to_string(),
            });
        }
        session.dispatch(FlowEvent::Forward);
        let depth = session.state().navigator.groups().len();

        for forward in moves {
            session.dispatch(if forward { FlowEvent::Forward } else { FlowEvent::Back });
            let navigator = &session.state().navigator;
            prop_assert_eq!(navigator.groups().len(), depth);
            prop_assert!(navigator.current_index() < depth);
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

fn category(i: usize) -> String {
    format!("cat-{i}")
}

proptest! {
    /// Pruning keeps exactly the live categories and borrows when nothing changes
    #[test]
    fn prune_keeps_live_entries(
        assigned in prop::collection::btree_map(0..6usize, 0..3usize, 0..6),
        live in prop::collection::btree_set(0..6usize, 0..6),
    ) {
        let assignments: IndexMap<String, String> = assigned
            .iter()
            .map(|(c, s)| (category(*c), format!("specialist-{s}")))
            .collect();
        let live: Vec<String> = live.into_iter().map(category).collect();

        let pruned = prune_assignments(&assignments, &live);
        prop_assert!(pruned.keys().all(|key| live.contains(key)));
        for (key, value) in pruned.iter() {
            prop_assert_eq!(assignments.get(key), Some(value));
        }

        let all_live = assignments.keys().all(|key| live.contains(key));
        prop_assert_eq!(matches!(pruned, Cow::Borrowed(_)), all_live);

        // A second pass over the result is always a no-op
        let settled = pruned.into_owned();
        let again = prune_assignments(&settled, &live);
        prop_assert!(matches!(again, Cow::Borrowed(map) if std::ptr::eq(map, &settled)));
    }
}
