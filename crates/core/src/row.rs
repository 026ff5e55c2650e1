//! Row structure for Tabulon.
//!
//! This module defines the `Row` struct which represents a single record in
//! a table, keyed by column name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Unique identifier for a row within its table.
pub type RowId = String;

/// Snapshot of one table: row id to row, in ascending id order.
pub type TableData = BTreeMap<RowId, Row>;

/// A row in a table: column name to cell value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell assignment.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Gets the value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Sets a cell, returning the previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.cells.insert(column.into(), value.into())
    }

    /// Removes a cell, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.cells.remove(column)
    }

    /// Returns true if the row has a cell for the column.
    #[inline]
    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Returns the number of cells in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if this row has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over `(column, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the column names present in this row.
    pub fn columns(&self) -> Vec<&str> {
        self.cells.keys().map(|k| k.as_str()).collect()
    }

    /// Overwrites this row's cells with every cell of `other`.
    pub fn merge(&mut self, other: &Row) {
        for (column, value) in other.iter() {
            self.cells.insert(column.to_string(), value.clone());
        }
    }

    /// Convenience accessor for string cells.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Convenience accessor for number cells.
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    /// Convenience accessor for boolean cells.
    pub fn get_bool(&self, column: &str) -> Option<bool> {
        self.get(column).and_then(Value::as_bool)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
