//! Property-based tests for undo/redo over a diff timeline.
//!
//! For any sequence of keyed writes, the live snapshot always equals the
//! reconstruction at the pointer, and `undo(n)` followed by `redo(n)`
//! restores the pre-undo state.

use proptest::prelude::*;
use rewind_common::Snapshot;
use rewind_history::Timeline;
use serde_json::{Value, json};

fn arb_write() -> impl Strategy<Value = (String, Value)> {
    (
        "[a-c]",
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::String),
            any::<u8>().prop_map(|n| json!({ "nested": n })),
        ],
    )
}

fn play(writes: &[(String, Value)]) -> (Timeline, Snapshot) {
    let mut live = Snapshot::new();
    let mut timeline = Timeline::new(&live);
    for (key, value) in writes {
        let before = live.clone();
        live.insert(key.clone(), value.clone());
        timeline.record(&before, &live);
    }
    (timeline, live)
}

proptest! {
    #[test]
    fn prop_live_matches_reconstruction(writes in prop::collection::vec(arb_write(), 0..12)) {
        let (timeline, live) = play(&writes);
        prop_assert_eq!(timeline.index(), writes.len());
        prop_assert_eq!(timeline.log().reconstruct(timeline.index()), Some(live));
    }

    #[test]
    fn prop_undo_then_redo_restores(
        writes in prop::collection::vec(arb_write(), 1..12),
        steps in 0usize..16,
    ) {
        let (mut timeline, mut live) = play(&writes);
        let original = live.clone();
        let n = steps.min(timeline.index());

        prop_assert_eq!(timeline.undo(n, &mut live), n);
        prop_assert_eq!(timeline.log().reconstruct(timeline.index()), Some(live.clone()));
        prop_assert_eq!(timeline.redo(n, &mut live), n);
        prop_assert_eq!(live, original);
        prop_assert_eq!(timeline.index(), writes.len());
    }

    #[test]
    fn prop_write_after_undo_truncates(
        writes in prop::collection::vec(arb_write(), 1..12),
        steps in 1usize..16,
    ) {
        let (mut timeline, mut live) = play(&writes);
        timeline.undo(steps, &mut live);
        let index_after_undo = timeline.index();

        let before = live.clone();
        live.insert("fresh".into(), json!(true));
        timeline.record(&before, &live);

        let history = timeline.history(None);
        prop_assert_eq!(history.len(), index_after_undo + 2);
        prop_assert!(!timeline.can_redo());
        prop_assert_eq!(history.last(), Some(&live));
    }
}
