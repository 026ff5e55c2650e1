//! Property-based tests for tabulon-storage using proptest.

use proptest::prelude::*;
use tabulon_core::schema::{TableSchemaBuilder, TablesSchema, ValuesSchema};
use tabulon_core::{CellType, Row, Value};
use tabulon_storage::{Journal, TableCache, ValueStore};

#[derive(Clone, Debug)]
enum Op {
    Set(u8, Value),
    Patch(u8, Value),
    Delete(u8),
}

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(Value::String),
        (0.0f64..100.0).prop_map(Value::Number),
        any::<bool>().prop_map(Value::Boolean),
    ]
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..5, any_value()).prop_map(|(id, v)| Op::Set(id, v)),
        (0u8..5, any_value()).prop_map(|(id, v)| Op::Patch(id, v)),
        (0u8..5).prop_map(Op::Delete),
    ]
}

fn create_cache() -> TableCache {
    let table = TableSchemaBuilder::new("items")
        .unwrap()
        .add_column("label", CellType::String)
        .unwrap()
        .add_column_with_default("score", CellType::Number, 0)
        .unwrap()
        .build()
        .unwrap();
    TableCache::new(&TablesSchema::new().with_table(table).unwrap())
}

/// Applies an op; every value is written into the `score` column so that
/// only numbers are accepted.
fn apply(cache: &mut TableCache, journal: &mut Journal, op: &Op) -> bool {
    let store = cache.get_table_mut("items").unwrap();
    let (id, result) = match op {
        Op::Set(id, v) => (
            format!("r{}", id),
            store.set_row(
                &format!("r{}", id),
                &Row::new().with("label", "x").with("score", v.clone()),
            ),
        ),
        Op::Patch(id, v) => (
            format!("r{}", id),
            store.set_partial_row(
                &format!("r{}", id),
                &Row::new().with("label", "y").with("score", v.clone()),
            ),
        ),
        Op::Delete(id) => (format!("r{}", id), Ok(store.delete(&format!("r{}", id)))),
    };
    match result {
        Ok(write) => {
            journal.record_write("items", &id, write);
            true
        }
        Err(_) => false,
    }
}

proptest! {
    /// A rejected write leaves the table exactly as it was.
    #[test]
    fn rejected_write_has_no_effect(ops in prop::collection::vec(any_op(), 1..40)) {
        let mut cache = create_cache();
        let mut journal = Journal::new();
        for op in &ops {
            let before = cache.get_table("items").unwrap().snapshot();
            if !apply(&mut cache, &mut journal, op) {
                prop_assert_eq!(cache.get_table("items").unwrap().snapshot(), before);
            }
        }
    }

    /// Rolling back a journal restores the state it started from.
    #[test]
    fn rollback_restores_start(
        setup in prop::collection::vec(any_op(), 0..20),
        ops in prop::collection::vec(any_op(), 1..40),
    ) {
        let mut cache = create_cache();
        let mut values = ValueStore::new(ValuesSchema::new());
        let mut setup_journal = Journal::new();
        for op in &setup {
            apply(&mut cache, &mut setup_journal, op);
        }
        let start = cache.snapshot();

        let mut journal = Journal::new();
        for op in &ops {
            apply(&mut cache, &mut journal, op);
        }
        journal.rollback(&mut cache, &mut values);
        prop_assert_eq!(cache.snapshot(), start);
    }

    /// The coalesced diff describes exactly the net difference.
    #[test]
    fn diff_matches_net_change(ops in prop::collection::vec(any_op(), 1..40)) {
        let mut cache = create_cache();
        let start = cache.get_table("items").unwrap().snapshot();
        let mut journal = Journal::new();
        for op in &ops {
            apply(&mut cache, &mut journal, op);
        }
        let end = cache.get_table("items").unwrap().snapshot();
        let changed = journal.get_table_diff("items").map(|d| !d.is_empty()).unwrap_or(false);
        prop_assert_eq!(changed, start != end);
    }
}
