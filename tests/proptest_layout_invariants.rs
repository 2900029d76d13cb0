//! Property-based invariant tests for arrangement, sizing and completion.
//!
//! 1. The normalizer yields exactly the arrangement's field count
//! 2. Row shares sum to 100% (or are all 0% for weightless rows)
//! 3. The wrapper for field i sits at position i of the flat list
//! 4. After a reset, tasks are not done and everything else is done

mod common;

use common::{Harness, question_field, scored, static_field};
use proptest::prelude::*;
use serde_json::Value;
use spark_placeholder::{
    Arrangement, CompletionState, FieldDescriptor, RawField, normalize_fields, row_shares,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn rows_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..5, 1..6)
}

fn arrangement_string(rows: &[usize]) -> String {
    rows.iter().map(usize::to_string).collect::<Vec<_>>().join("-")
}

fn fields_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(prop::bool::ANY.prop_map(|task| if task { question_field() } else { static_field() }), 0..20)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Normalizer count
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalizer_yields_arrangement_total(rows in rows_strategy(), supplied in 0usize..30) {
        let arrangement = Arrangement::parse(&arrangement_string(&rows)).unwrap();
        let fields = normalize_fields(vec![RawField::default(); supplied], &arrangement);
        prop_assert_eq!(fields.len(), rows.iter().sum::<usize>());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Share sum
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shares_sum_to_hundred(widths in prop::collection::vec(0.0f64..1000.0, 1..8)) {
        let fields: Vec<FieldDescriptor> = widths
            .iter()
            .map(|&width| FieldDescriptor::default().width(width))
            .collect();
        let shares = row_shares(&fields);
        let total: f64 = widths.iter().sum();

        if total > 0.0 {
            prop_assert!((shares.iter().sum::<f64>() - 100.0).abs() < 1e-6);
        } else {
            prop_assert!(shares.iter().all(|&share| share == 0.0));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Absolute-index stability
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapper_position_is_field_index(rows in rows_strategy(), fields in fields_strategy()) {
        let harness = Harness::new();
        let placeholder = harness.build(&arrangement_string(&rows), fields);

        prop_assert_eq!(placeholder.wrappers().len(), rows.iter().sum::<usize>());
        for (position, wrapper) in placeholder.wrappers().iter().enumerate() {
            prop_assert_eq!(wrapper.index(), position);
            prop_assert_eq!(placeholder.tree().slot(position).map(|slot| slot.index), Some(position));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Reset law
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_restores_done_flags(
        rows in rows_strategy(),
        fields in fields_strategy(),
        scoring in prop::collection::vec(0usize..20, 0..20),
    ) {
        let harness = Harness::new();
        let placeholder = harness.build(&arrangement_string(&rows), fields);

        for index in scoring {
            if placeholder.wrapper(index).is_some_and(|wrapper| wrapper.is_task()) {
                harness.factory.channel(index).trigger(&scored(1.0));
            }
        }
        harness.frames.run_until_idle(4);
        placeholder.reset_task();

        for wrapper in placeholder.wrappers() {
            prop_assert_eq!(wrapper.is_done(), !wrapper.is_task());
        }
        prop_assert_eq!(placeholder.completion_state(), CompletionState::Incomplete);
    }
}
