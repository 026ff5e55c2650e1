//! Change sets passed to listeners.
//!
//! A ChangeSet represents the net difference one committed operation (or one
//! transaction) made to a single table: the row ids added, updated and
//! removed. Listeners re-read the store for the rows themselves.

use tabulon_core::{RowId, Value};
use tabulon_storage::TableDiff;

/// A set of changes to one table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Table the changes belong to
    pub table: String,
    /// Rows that did not exist before
    pub added: Vec<RowId>,
    /// Rows whose cells changed
    pub updated: Vec<RowId>,
    /// Rows that were deleted
    pub removed: Vec<RowId>,
}

impl ChangeSet {
    /// Creates a new empty change set for a table.
    #[inline]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Creates a change set from a coalesced table diff.
    pub fn from_diff(diff: &TableDiff) -> Self {
        Self {
            table: diff.table_name().to_string(),
            added: diff.get_added().keys().cloned().collect(),
            updated: diff.get_modified().keys().cloned().collect(),
            removed: diff.get_deleted().keys().cloned().collect(),
        }
    }

    /// Returns true if there are no changes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Returns the total number of changed rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }

    /// Iterates over every changed row id.
    pub fn row_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.added
            .iter()
            .chain(self.updated.iter())
            .chain(self.removed.iter())
            .map(|s| s.as_str())
    }

    /// Returns the subset of this change set concerning one row.
    pub fn restrict_to(&self, row_id: &str) -> ChangeSet {
        let keep = |ids: &[RowId]| -> Vec<RowId> {
            ids.iter().filter(|id| id.as_str() == row_id).cloned().collect()
        };
        ChangeSet {
            table: self.table.clone(),
            added: keep(&self.added),
            updated: keep(&self.updated),
            removed: keep(&self.removed),
        }
    }
}

/// A change to a standalone value, as reads see it: a stored value, else
/// its default. `None` means unset with no default.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueChange {
    /// Value name
    pub name: String,
    /// Value read before the change
    pub old: Option<Value>,
    /// Value read after the change
    pub new: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulon_core::Row;

    fn row(v: &str) -> Row {
        Row::new().with("name", v)
    }

    #[test]
    fn test_change_set_new() {
        let cs = ChangeSet::new("users");
        assert!(cs.is_empty());
        assert_eq!(cs.len(), 0);
        assert_eq!(cs.table, "users");
    }

    #[test]
    fn test_change_set_from_diff() {
        let mut diff = TableDiff::new("users");
        diff.add("u1", row("a"));
        diff.modify("u2", row("b"), row("c"));
        diff.delete("u3", row("d"));

        let cs = ChangeSet::from_diff(&diff);
        assert_eq!(cs.added, vec!["u1".to_string()]);
        assert_eq!(cs.updated, vec!["u2".to_string()]);
        assert_eq!(cs.removed, vec!["u3".to_string()]);
        assert_eq!(cs.len(), 3);
    }

    #[test]
    fn test_change_set_restrict() {
        let cs = ChangeSet {
            table: "users".into(),
            added: vec!["u1".into()],
            updated: vec!["u2".into()],
            removed: vec![],
        };
        assert_eq!(cs.row_ids().collect::<Vec<_>>(), vec!["u1", "u2"]);

        let only = cs.restrict_to("u2");
        assert_eq!(only.len(), 1);
        assert!(only.added.is_empty());
        assert!(cs.restrict_to("u3").is_empty());
    }
}
