//! Journal for tracking changes in Tabulon.
//!
//! This module provides the `Journal` struct for recording the row and value
//! changes made by one store operation or one transaction. The journal keeps
//! an ordered entry list for rollback and a coalesced per-table diff for
//! change notification.

use std::collections::BTreeMap;

use tabulon_core::{Row, RowId, Value};

use crate::cache::TableCache;
use crate::row_store::RowWrite;
use crate::values::{ValueStore, ValueWrite};

/// A single journal entry representing a change.
#[derive(Clone, Debug)]
pub enum JournalEntry {
    /// A row was inserted.
    Insert {
        table: String,
        row_id: RowId,
        row: Row,
    },
    /// A row was updated.
    Update {
        table: String,
        row_id: RowId,
        old: Row,
        new: Row,
    },
    /// A row was deleted.
    Delete {
        table: String,
        row_id: RowId,
        row: Row,
    },
    /// A stored value was set or deleted.
    Value(ValueWrite),
}

/// Table diff tracking net changes for a single table.
#[derive(Clone, Debug, Default)]
pub struct TableDiff {
    /// Table name.
    table_name: String,
    /// Added rows (row_id → row).
    added: BTreeMap<RowId, Row>,
    /// Modified rows (row_id → (old, new)).
    modified: BTreeMap<RowId, (Row, Row)>,
    /// Deleted rows (row_id → row).
    deleted: BTreeMap<RowId, Row>,
}

impl TableDiff {
    /// Creates a new table diff.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Returns the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Records an addition.
    pub fn add(&mut self, row_id: &str, row: Row) {
        // If this row was previously deleted, convert to modify
        if let Some(old_row) = self.deleted.remove(row_id) {
            if old_row != row {
                self.modified.insert(row_id.to_string(), (old_row, row));
            }
        } else {
            self.added.insert(row_id.to_string(), row);
        }
    }

    /// Records a modification.
    pub fn modify(&mut self, row_id: &str, old: Row, new: Row) {
        if let Some(added) = self.added.get_mut(row_id) {
            // Added in this diff: keep it as an add with the new value
            *added = new;
        } else if let Some((original, _)) = self.modified.remove(row_id) {
            // Keep original old value; drop the entry if it was reverted
            if original != new {
                self.modified.insert(row_id.to_string(), (original, new));
            }
        } else {
            self.modified.insert(row_id.to_string(), (old, new));
        }
    }

    /// Records a deletion.
    pub fn delete(&mut self, row_id: &str, row: Row) {
        // If this row was added in this diff, just remove from added
        if self.added.remove(row_id).is_some() {
            return;
        }
        // If this row was modified, use the original old value
        if let Some((old_row, _)) = self.modified.remove(row_id) {
            self.deleted.insert(row_id.to_string(), old_row);
        } else {
            self.deleted.insert(row_id.to_string(), row);
        }
    }

    /// Returns added rows.
    pub fn get_added(&self) -> &BTreeMap<RowId, Row> {
        &self.added
    }

    /// Returns modified rows.
    pub fn get_modified(&self) -> &BTreeMap<RowId, (Row, Row)> {
        &self.modified
    }

    /// Returns deleted rows.
    pub fn get_deleted(&self) -> &BTreeMap<RowId, Row> {
        &self.deleted
    }

    /// Returns true if there are no net changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// Journal for tracking changes within an operation or transaction.
#[derive(Debug, Default)]
pub struct Journal {
    /// Table diffs (table name → diff).
    table_diffs: BTreeMap<String, TableDiff>,
    /// Net value changes (name → (old, new)).
    value_diffs: BTreeMap<String, (Option<Value>, Option<Value>)>,
    /// Ordered list of entries for rollback.
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Creates a new empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a row write. Unchanged writes are skipped.
    pub fn record_write(&mut self, table: &str, row_id: &str, write: RowWrite) {
        match write {
            RowWrite::Inserted(row) => self.record_insert(table, row_id, row),
            RowWrite::Updated { old, new } => self.record_update(table, row_id, old, new),
            RowWrite::Deleted(row) => self.record_delete(table, row_id, row),
            RowWrite::Unchanged => {}
        }
    }

    /// Records an insert operation.
    pub fn record_insert(&mut self, table: &str, row_id: &str, row: Row) {
        self.get_or_create_diff(table).add(row_id, row.clone());
        self.entries.push(JournalEntry::Insert {
            table: table.into(),
            row_id: row_id.into(),
            row,
        });
    }

    /// Records an update operation.
    pub fn record_update(&mut self, table: &str, row_id: &str, old: Row, new: Row) {
        self.get_or_create_diff(table)
            .modify(row_id, old.clone(), new.clone());
        self.entries.push(JournalEntry::Update {
            table: table.into(),
            row_id: row_id.into(),
            old,
            new,
        });
    }

    /// Records a delete operation.
    pub fn record_delete(&mut self, table: &str, row_id: &str, row: Row) {
        self.get_or_create_diff(table).delete(row_id, row.clone());
        self.entries.push(JournalEntry::Delete {
            table: table.into(),
            row_id: row_id.into(),
            row,
        });
    }

    /// Records a value write. Only writes that change what reads return
    /// count towards the net value changes.
    pub fn record_value(&mut self, write: ValueWrite) {
        if write.old != write.new {
            let original = match self.value_diffs.remove(&write.name) {
                Some((original, _)) => original,
                None => write.old.clone(),
            };
            if original != write.new {
                self.value_diffs
                    .insert(write.name.clone(), (original, write.new.clone()));
            }
        }
        self.entries.push(JournalEntry::Value(write));
    }

    /// Appends every entry of another journal, coalescing diffs.
    pub fn extend(&mut self, other: Journal) {
        for entry in other.entries {
            match entry {
                JournalEntry::Insert { table, row_id, row } => {
                    self.record_insert(&table, &row_id, row)
                }
                JournalEntry::Update {
                    table,
                    row_id,
                    old,
                    new,
                } => self.record_update(&table, &row_id, old, new),
                JournalEntry::Delete { table, row_id, row } => {
                    self.record_delete(&table, &row_id, row)
                }
                JournalEntry::Value(write) => self.record_value(write),
            }
        }
    }

    /// Gets or creates a table diff.
    fn get_or_create_diff(&mut self, table: &str) -> &mut TableDiff {
        self.table_diffs
            .entry(table.to_string())
            .or_insert_with(|| TableDiff::new(table))
    }

    /// Returns all journal entries.
    pub fn get_entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Returns the table diff for a table.
    pub fn get_table_diff(&self, table: &str) -> Option<&TableDiff> {
        self.table_diffs.get(table)
    }

    /// Returns the diffs of every table with net changes.
    pub fn changed_tables(&self) -> impl Iterator<Item = &TableDiff> + '_ {
        self.table_diffs.values().filter(|d| !d.is_empty())
    }

    /// Returns net value changes as `(name, old, new)`.
    pub fn changed_values(&self) -> impl Iterator<Item = (&str, &Option<Value>, &Option<Value>)> + '_ {
        self.value_diffs
            .iter()
            .map(|(name, (old, new))| (name.as_str(), old, new))
    }

    /// Returns true if the journal recorded nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if there are net changes to notify.
    pub fn has_net_changes(&self) -> bool {
        self.changed_tables().next().is_some() || !self.value_diffs.is_empty()
    }

    /// Rolls back the journal changes, newest first.
    pub fn rollback(self, cache: &mut TableCache, values: &mut ValueStore) {
        for entry in self.entries.into_iter().rev() {
            match entry {
                JournalEntry::Insert { table, row_id, .. } => {
                    if let Ok(store) = cache.get_table_mut(&table) {
                        store.remove(&row_id);
                    }
                }
                JournalEntry::Update {
                    table, row_id, old, ..
                } => {
                    if let Ok(store) = cache.get_table_mut(&table) {
                        store.put(&row_id, old);
                    }
                }
                JournalEntry::Delete { table, row_id, row } => {
                    if let Ok(store) = cache.get_table_mut(&table) {
                        store.put(&row_id, row);
                    }
                }
                JournalEntry::Value(write) => values.restore(&write.name, write.stored),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulon_core::schema::{TableSchemaBuilder, TablesSchema, ValuesSchemaBuilder};
    use tabulon_core::CellType;

    fn row(name: &str) -> Row {
        Row::new().with("name", name)
    }

    #[test]
    fn test_table_diff_add_then_delete_cancels() {
        let mut diff = TableDiff::new("users");
        diff.add("u1", row("A"));
        diff.delete("u1", row("A"));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_table_diff_modify_keeps_original() {
        let mut diff = TableDiff::new("users");
        diff.modify("u1", row("A"), row("B"));
        diff.modify("u1", row("B"), row("C"));
        let (old, new) = &diff.get_modified()["u1"];
        assert_eq!(old, &row("A"));
        assert_eq!(new, &row("C"));
    }

    #[test]
    fn test_table_diff_revert_is_empty() {
        let mut diff = TableDiff::new("users");
        diff.modify("u1", row("A"), row("B"));
        diff.modify("u1", row("B"), row("A"));
        assert!(diff.is_empty());

        diff.delete("u2", row("X"));
        diff.add("u2", row("X"));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_table_diff_delete_then_add_is_modify() {
        let mut diff = TableDiff::new("users");
        diff.delete("u1", row("A"));
        diff.add("u1", row("B"));
        assert_eq!(diff.get_modified().len(), 1);
        assert!(diff.get_deleted().is_empty());
    }

    #[test]
    fn test_journal_value_coalescing() {
        let write = |stored: Option<&str>, old: Option<&str>, new: Option<&str>| ValueWrite {
            name: "theme".to_string(),
            stored: stored.map(Value::from),
            old: old.map(Value::from),
            new: new.map(Value::from),
        };
        let mut journal = Journal::new();
        journal.record_value(write(None, None, Some("dark")));
        journal.record_value(write(Some("dark"), Some("dark"), None));
        assert!(!journal.has_net_changes());
        assert_eq!(journal.get_entries().len(), 2);

        // Storing the default changes storage but not what reads return.
        journal.record_value(write(None, Some("light"), Some("light")));
        assert!(!journal.has_net_changes());
        assert_eq!(journal.get_entries().len(), 3);
    }

    #[test]
    fn test_journal_extend_coalesces() {
        let mut outer = Journal::new();
        outer.record_insert("users", "u1", row("A"));
        let mut inner = Journal::new();
        inner.record_update("users", "u1", row("A"), row("B"));
        outer.extend(inner);

        let diff = outer.get_table_diff("users").unwrap();
        assert_eq!(diff.get_added()["u1"], row("B"));
        assert_eq!(outer.get_entries().len(), 2);
    }

    #[test]
    fn test_journal_rollback() {
        let table = TableSchemaBuilder::new("users")
            .unwrap()
            .add_column("name", CellType::String)
            .unwrap()
            .build()
            .unwrap();
        let mut cache = TableCache::new(&TablesSchema::new().with_table(table).unwrap());
        let mut values = ValueStore::new(
            ValuesSchemaBuilder::new()
                .add_value("theme", CellType::String)
                .unwrap()
                .build(),
        );
        let mut setup = Journal::new();
        let write = cache.get_table_mut("users").unwrap().set_row("u1", &row("A")).unwrap();
        setup.record_write("users", "u1", write);

        let before_rows = cache.get_table("users").unwrap().snapshot();

        let mut journal = Journal::new();
        let users = cache.get_table_mut("users").unwrap();
        let w = users.set_row("u1", &row("B")).unwrap();
        journal.record_write("users", "u1", w);
        let w = users.set_row("u2", &row("C")).unwrap();
        journal.record_write("users", "u2", w);
        let w = users.delete("u1");
        journal.record_write("users", "u1", w);
        let write = values.set("theme", Value::from("dark")).unwrap().unwrap();
        journal.record_value(write);

        journal.rollback(&mut cache, &mut values);

        assert_eq!(cache.get_table("users").unwrap().snapshot(), before_rows);
        assert_eq!(values.get("theme").unwrap(), None);
    }
}
