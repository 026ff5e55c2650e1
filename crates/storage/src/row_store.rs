//! Row storage for Tabulon.
//!
//! This module provides the `RowStore` struct which holds the rows of a
//! single table and enforces that table's schema on every write. Each write
//! validates the complete resulting row before touching the map, so a
//! rejected write never leaves partial state behind.

use std::collections::BTreeMap;

use tabulon_core::schema::TableSchema;
use tabulon_core::{Result, Row, RowId, TableData, Value};

/// Outcome of a single row write.
#[derive(Clone, Debug, PartialEq)]
pub enum RowWrite {
    /// The row did not exist before.
    Inserted(Row),
    /// The row existed and its cells changed.
    Updated { old: Row, new: Row },
    /// The row was removed.
    Deleted(Row),
    /// The write stored data identical to what was there.
    Unchanged,
}

impl RowWrite {
    /// Returns true if stored state changed.
    #[inline]
    pub fn is_change(&self) -> bool {
        !matches!(self, RowWrite::Unchanged)
    }
}

/// Row storage for a single table.
#[derive(Clone, Debug)]
pub struct RowStore {
    schema: TableSchema,
    rows: BTreeMap<RowId, Row>,
}

impl RowStore {
    /// Creates an empty row store for the given table schema.
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
        }
    }

    /// Returns the table schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets a row by ID.
    pub fn get(&self, row_id: &str) -> Option<&Row> {
        self.rows.get(row_id)
    }

    /// Returns true if a row with this ID exists.
    pub fn contains(&self, row_id: &str) -> bool {
        self.rows.contains_key(row_id)
    }

    /// Returns all row IDs in order.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.keys().cloned().collect()
    }

    /// Returns a detached copy of every row.
    pub fn snapshot(&self) -> TableData {
        self.rows.clone()
    }

    /// Replaces a row entirely.
    pub fn set_row(&mut self, row_id: &str, row: &Row) -> Result<RowWrite> {
        let row = self.schema.conform_row(row)?;
        Ok(self.put(row_id, row))
    }

    /// Merges cells into a row, creating it from defaults when absent.
    pub fn set_partial_row(&mut self, row_id: &str, partial: &Row) -> Result<RowWrite> {
        let merged = self.schema.merge_row(self.rows.get(row_id), partial)?;
        Ok(self.put(row_id, merged))
    }

    /// Sets a single cell; same rules as `set_partial_row`.
    pub fn set_cell(&mut self, row_id: &str, column: &str, value: Value) -> Result<RowWrite> {
        self.set_partial_row(row_id, &Row::new().with(column, value))
    }

    /// Deletes a row. Absent rows are not an error.
    pub fn delete(&mut self, row_id: &str) -> RowWrite {
        match self.rows.remove(row_id) {
            Some(row) => RowWrite::Deleted(row),
            None => RowWrite::Unchanged,
        }
    }

    /// Removes every row.
    pub fn clear(&mut self) -> Vec<(RowId, RowWrite)> {
        core::mem::take(&mut self.rows)
            .into_iter()
            .map(|(id, row)| (id, RowWrite::Deleted(row)))
            .collect()
    }

    /// Validates a full replacement of this table's rows.
    ///
    /// Returns the rows with defaults filled in, ready for `replace_all`.
    pub fn conform_all(&self, rows: &TableData) -> Result<TableData> {
        rows.iter()
            .map(|(id, row)| Ok((id.clone(), self.schema.conform_row(row)?)))
            .collect()
    }

    /// Replaces every row with already-conformed rows.
    pub fn replace_all(&mut self, rows: TableData) -> Vec<(RowId, RowWrite)> {
        let mut writes = Vec::new();
        let stale: Vec<RowId> = self
            .rows
            .keys()
            .filter(|id| !rows.contains_key(*id))
            .cloned()
            .collect();
        for id in stale {
            let write = self.delete(&id);
            writes.push((id, write));
        }
        for (id, row) in rows {
            let write = self.put(&id, row);
            if write.is_change() {
                writes.push((id, write));
            }
        }
        writes
    }

    /// Stores a row without validation. Used for journal rollback.
    pub(crate) fn put(&mut self, row_id: &str, row: Row) -> RowWrite {
        match self.rows.insert(row_id.to_string(), row.clone()) {
            None => RowWrite::Inserted(row),
            Some(old) if old == row => RowWrite::Unchanged,
            Some(old) => RowWrite::Updated { old, new: row },
        }
    }

    /// Removes a row without reporting. Used for journal rollback.
    pub(crate) fn remove(&mut self, row_id: &str) -> Option<Row> {
        self.rows.remove(row_id)
    }
}
