//! Cache management for Tabulon.
//!
//! This module provides the `TableCache` struct which manages the row
//! stores of every table declared by a `TablesSchema`.

use std::collections::BTreeMap;

use tabulon_core::schema::TablesSchema;
use tabulon_core::{Error, Result, RowId, TableData};

use crate::row_store::{RowStore, RowWrite};

/// A row write tagged with its table: `(table, row_id, write)`.
pub type TableWrite = (String, RowId, RowWrite);

/// Cache for managing multiple table stores.
#[derive(Clone, Debug, Default)]
pub struct TableCache {
    /// Table name → RowStore mapping.
    tables: BTreeMap<String, RowStore>,
}

impl TableCache {
    /// Creates an empty store for every table in the schema.
    pub fn new(schema: &TablesSchema) -> Self {
        Self {
            tables: schema
                .iter()
                .map(|t| (t.name().to_string(), RowStore::new(t.clone())))
                .collect(),
        }
    }

    /// Gets a reference to a table store.
    pub fn get_table(&self, name: &str) -> Result<&RowStore> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Gets a mutable reference to a table store.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut RowStore> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Returns all table names.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Returns a detached copy of every table.
    pub fn snapshot(&self) -> BTreeMap<String, TableData> {
        self.tables
            .iter()
            .map(|(name, store)| (name.clone(), store.snapshot()))
            .collect()
    }

    /// Validates a wholesale replacement of every table.
    ///
    /// Tables absent from `bulk` are replaced by empty tables.
    pub fn conform_all(
        &self,
        bulk: &BTreeMap<String, TableData>,
    ) -> Result<BTreeMap<String, TableData>> {
        if let Some(unknown) = bulk.keys().find(|name| !self.tables.contains_key(*name)) {
            return Err(Error::table_not_found(unknown.as_str()));
        }
        self.tables
            .iter()
            .map(|(name, store)| {
                let rows = match bulk.get(name) {
                    Some(rows) => store.conform_all(rows)?,
                    None => TableData::new(),
                };
                Ok((name.clone(), rows))
            })
            .collect()
    }

    /// Applies a replacement produced by `conform_all`.
    pub fn replace_all(&mut self, conformed: BTreeMap<String, TableData>) -> Vec<TableWrite> {
        let mut writes = Vec::new();
        for (name, rows) in conformed {
            if let Some(store) = self.tables.get_mut(&name) {
                writes.extend(
                    store
                        .replace_all(rows)
                        .into_iter()
                        .map(|(id, write)| (name.clone(), id, write)),
                );
            }
        }
        tracing::trace!(changed = writes.len(), "replaced all tables");
        writes
    }
}
