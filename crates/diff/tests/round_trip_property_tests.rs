//! Property-based tests for the diff round-trip law.
//!
//! For any two snapshots `a` and `b`, applying `Diff::compute(a, b)` to `a`
//! must reproduce `b` exactly.

use proptest::prelude::*;
use rewind_common::Snapshot;
use rewind_diff::{Change, Diff};
use serde_json::Value;

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..3).prop_map(Value::Array),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        // Small key alphabet so before/after overlap often
        prop::collection::btree_map("[a-d]", inner, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    })
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    prop::collection::btree_map("[a-e]", arb_value(), 0..5).prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_apply_compute_round_trips(a in arb_snapshot(), b in arb_snapshot()) {
        let diff = Diff::compute(&a, &b);
        prop_assert_eq!(diff.apply(&a), b.clone());
        prop_assert_eq!(diff.try_apply(&a).unwrap(), b);
    }

    #[test]
    fn prop_self_diff_is_empty(a in arb_snapshot()) {
        prop_assert!(Diff::compute(&a, &a).is_empty());
    }

    #[test]
    fn prop_diff_from_empty_only_puts(a in arb_snapshot()) {
        let diff = Diff::compute(&Snapshot::new(), &a);
        prop_assert_eq!(diff.len(), a.len());
        prop_assert!(
            diff.changes().iter().all(|c| matches!(c, Change::Put { .. })),
            "non-put change in diff from empty"
        );
    }
}
