//! Store - Main entry point for Tabulon operations.
//!
//! This module provides the `Store` struct which binds schemas, serves reads
//! and writes, and notifies listeners synchronously after each committed
//! mutation.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use tabulon_core::schema::{TablesSchema, ValuesSchema};
use tabulon_core::{Error, Result, Row, RowId, TableData, Value};
use tabulon_reactive::{ChangeSet, ListenerId, ListenerRegistry, ValueChange};
use tabulon_storage::{Journal, TableCache, ValueStore};
use tracing::{debug, trace, warn};

use crate::config::StoreConfig;

/// Schemas and data behind a store.
pub(crate) struct StoreState {
    pub(crate) tables_schema: TablesSchema,
    pub(crate) values_schema: ValuesSchema,
    pub(crate) tables: TableCache,
    pub(crate) values: ValueStore,
    /// Set once any row or value has been stored; locks the schemas.
    pub(crate) written: bool,
}

impl StoreState {
    fn new() -> Self {
        Self {
            tables_schema: TablesSchema::new(),
            values_schema: ValuesSchema::new(),
            tables: TableCache::default(),
            values: ValueStore::default(),
            written: false,
        }
    }
}

/// Writes collected by an open transaction.
#[derive(Default)]
pub(crate) struct Batch {
    pub(crate) journal: Journal,
    /// Tables targeted by no-op writes, notified when `notify_on_noop` is set.
    pub(crate) noop_tables: BTreeSet<String>,
}

/// A schema-enforced, in-memory, reactive tabular store.
///
/// Every method takes `&self`, so listeners holding an `Rc<Store>` may read
/// and write from inside their callbacks. Callbacks run synchronously on the
/// writer's stack after the change is visible.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tabulon_core::schema::{TableSchemaBuilder, TablesSchema};
/// use tabulon_core::{CellType, Row};
/// use tabulon_store::Store;
///
/// let users = TableSchemaBuilder::new("users")
///     .unwrap()
///     .add_column("name", CellType::String)
///     .unwrap()
///     .build()
///     .unwrap();
/// let store = Store::new();
/// store.set_tables_schema(TablesSchema::new().with_table(users).unwrap()).unwrap();
///
/// let fired = Rc::new(Cell::new(0));
/// let fired_clone = fired.clone();
/// store
///     .add_table_listener("users", move |_| fired_clone.set(fired_clone.get() + 1))
///     .unwrap();
///
/// store.set_row("users", "user-1", Row::new().with("name", "Alice")).unwrap();
/// assert_eq!(fired.get(), 1);
/// assert!(store.has_row("users", "user-1").unwrap());
/// ```
pub struct Store {
    pub(crate) config: StoreConfig,
    pub(crate) state: RefCell<StoreState>,
    pub(crate) listeners: RefCell<ListenerRegistry>,
    next_row_id: Cell<u64>,
    pub(crate) batch: RefCell<Option<Batch>>,
    notify_depth: Cell<usize>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store with no schema bound.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            next_row_id: Cell::new(config.first_row_id()),
            config,
            state: RefCell::new(StoreState::new()),
            listeners: RefCell::new(ListenerRegistry::new()),
            batch: RefCell::new(None),
            notify_depth: Cell::new(0),
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ---- schema binding ----

    /// Binds the tables schema, creating an empty table for each entry.
    ///
    /// Fails with `SchemaLocked` once any row or value has been written.
    pub fn set_tables_schema(&self, schema: TablesSchema) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.written {
            return Err(Error::schema_locked(
                "tables schema cannot change once data has been written",
            ));
        }
        state.tables = TableCache::new(&schema);
        debug!(tables = schema.len(), "bound tables schema");
        state.tables_schema = schema;
        Ok(())
    }

    /// Binds the values schema.
    ///
    /// Fails with `SchemaLocked` once any row or value has been written.
    pub fn set_values_schema(&self, schema: ValuesSchema) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.written {
            return Err(Error::schema_locked(
                "values schema cannot change once data has been written",
            ));
        }
        state.values = ValueStore::new(schema.clone());
        debug!(values = schema.len(), "bound values schema");
        state.values_schema = schema;
        Ok(())
    }

    /// Returns the bound tables schema.
    pub fn tables_schema(&self) -> TablesSchema {
        self.state.borrow().tables_schema.clone()
    }

    /// Returns the bound values schema.
    pub fn values_schema(&self) -> ValuesSchema {
        self.state.borrow().values_schema.clone()
    }

    // ---- reads ----

    /// Returns a copy of every table.
    pub fn get_tables(&self) -> BTreeMap<String, TableData> {
        self.state.borrow().tables.snapshot()
    }

    /// Returns a copy of one table.
    pub fn get_table(&self, table: &str) -> Result<TableData> {
        Ok(self.state.borrow().tables.get_table(table)?.snapshot())
    }

    /// Returns a copy of one row, or `None` if absent.
    pub fn get_row(&self, table: &str, row_id: &str) -> Result<Option<Row>> {
        Ok(self.state.borrow().tables.get_table(table)?.get(row_id).cloned())
    }

    /// Returns one cell, or `None` if the row is absent.
    pub fn get_cell(&self, table: &str, row_id: &str, column: &str) -> Result<Option<Value>> {
        let state = self.state.borrow();
        let store = state.tables.get_table(table)?;
        if store.schema().get_column(column).is_none() {
            return Err(Error::column_not_found(table, column));
        }
        Ok(store.get(row_id).and_then(|row| row.get(column)).cloned())
    }

    /// Returns true if the row exists.
    pub fn has_row(&self, table: &str, row_id: &str) -> Result<bool> {
        Ok(self.state.borrow().tables.get_table(table)?.contains(row_id))
    }

    /// Returns the row ids of a table in ascending order.
    pub fn row_ids(&self, table: &str) -> Result<Vec<RowId>> {
        Ok(self.state.borrow().tables.get_table(table)?.row_ids())
    }

    /// Returns the number of rows in a table.
    pub fn row_count(&self, table: &str) -> Result<usize> {
        Ok(self.state.borrow().tables.get_table(table)?.len())
    }

    /// Returns the names of every bound table.
    pub fn table_ids(&self) -> Vec<String> {
        self.state
            .borrow()
            .tables
            .table_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Returns a value: stored, else its default, else `None`.
    pub fn get_value(&self, name: &str) -> Result<Option<Value>> {
        self.state.borrow().values.get(name)
    }

    /// Returns every value that reads as set, defaults included.
    pub fn get_values(&self) -> BTreeMap<String, Value> {
        self.state.borrow().values.snapshot()
    }

    // ---- writes ----

    /// Replaces a row entirely.
    pub fn set_row(&self, table: &str, row_id: &str, row: Row) -> Result<()> {
        self.mutate("set_row", Some(table), |state, journal| {
            let write = state.tables.get_table_mut(table)?.set_row(row_id, &row)?;
            journal.record_write(table, row_id, write);
            Ok(())
        })
    }

    /// Merges cells into a row, creating it from defaults when absent.
    pub fn set_partial_row(&self, table: &str, row_id: &str, partial: Row) -> Result<()> {
        self.mutate("set_partial_row", Some(table), |state, journal| {
            let write = state
                .tables
                .get_table_mut(table)?
                .set_partial_row(row_id, &partial)?;
            journal.record_write(table, row_id, write);
            Ok(())
        })
    }

    /// Sets a single cell.
    pub fn set_cell(
        &self,
        table: &str,
        row_id: &str,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        self.mutate("set_cell", Some(table), |state, journal| {
            let write = state
                .tables
                .get_table_mut(table)?
                .set_cell(row_id, column, value)?;
            journal.record_write(table, row_id, write);
            Ok(())
        })
    }

    /// Stores a full row under a generated id and returns the id.
    pub fn add_row(&self, table: &str, row: Row) -> Result<RowId> {
        let row_id = self.generate_row_id(table, "")?;
        self.set_row(table, &row_id, row)?;
        Ok(row_id)
    }

    /// Generates a row id not yet used in the table.
    ///
    /// Ids come from a counter owned by the store, formatted as
    /// `"{prefix}{n}"`; counter values whose id is taken are skipped.
    pub fn generate_row_id(&self, table: &str, prefix: &str) -> Result<RowId> {
        let state = self.state.borrow();
        let store = state.tables.get_table(table)?;
        loop {
            let n = self.next_row_id.get();
            self.next_row_id.set(n.wrapping_add(1));
            let row_id = format!("{}{}", prefix, n);
            if !store.contains(&row_id) {
                trace!(table, row_id = %row_id, "generated row id");
                return Ok(row_id);
            }
        }
    }

    /// Deletes a row. Deleting an absent row does nothing.
    pub fn del_row(&self, table: &str, row_id: &str) -> Result<()> {
        self.mutate("del_row", Some(table), |state, journal| {
            let write = state.tables.get_table_mut(table)?.delete(row_id);
            journal.record_write(table, row_id, write);
            Ok(())
        })
    }

    /// Deletes every row of a table.
    pub fn del_table(&self, table: &str) -> Result<()> {
        self.mutate("del_table", Some(table), |state, journal| {
            for (row_id, write) in state.tables.get_table_mut(table)?.clear() {
                journal.record_write(table, &row_id, write);
            }
            Ok(())
        })
    }

    /// Replaces every table at once.
    ///
    /// All rows are validated before any is applied; tables absent from
    /// `tables` become empty.
    pub fn set_tables(&self, tables: BTreeMap<String, TableData>) -> Result<()> {
        self.mutate("set_tables", None, |state, journal| {
            let conformed = state.tables.conform_all(&tables)?;
            for (table, row_id, write) in state.tables.replace_all(conformed) {
                journal.record_write(&table, &row_id, write);
            }
            Ok(())
        })
    }

    /// Replaces every stored value at once.
    pub fn set_values(&self, values: BTreeMap<String, Value>) -> Result<()> {
        self.mutate("set_values", None, |state, journal| {
            state.values.conform_all(&values)?;
            for write in state.values.replace_all(values) {
                journal.record_value(write);
            }
            Ok(())
        })
    }

    /// Sets one value.
    pub fn set_value(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate("set_value", None, |state, journal| {
            if let Some(write) = state.values.set(name, value)? {
                journal.record_value(write);
            }
            Ok(())
        })
    }

    /// Unsets one value; it then reads back its default.
    pub fn del_value(&self, name: &str) -> Result<()> {
        self.mutate("del_value", None, |state, journal| {
            if let Some(write) = state.values.delete(name)? {
                journal.record_value(write);
            }
            Ok(())
        })
    }

    // ---- listeners ----

    /// Registers a listener fired once per committed change to a table.
    pub fn add_table_listener<F>(&self, table: &str, callback: F) -> Result<ListenerId>
    where
        F: Fn(&ChangeSet) + 'static,
    {
        self.state.borrow().tables.get_table(table)?;
        Ok(self
            .listeners
            .borrow_mut()
            .add_table_listener(table, callback))
    }

    /// Registers a listener fired once per committed change to one row.
    ///
    /// The row does not need to exist yet.
    pub fn add_row_listener<F>(&self, table: &str, row_id: &str, callback: F) -> Result<ListenerId>
    where
        F: Fn(&ChangeSet) + 'static,
    {
        self.state.borrow().tables.get_table(table)?;
        Ok(self
            .listeners
            .borrow_mut()
            .add_row_listener(table, row_id, callback))
    }

    /// Registers a listener fired once per committed change to a value.
    pub fn add_value_listener<F>(&self, name: &str, callback: F) -> Result<ListenerId>
    where
        F: Fn(&ValueChange) + 'static,
    {
        if !self.state.borrow().values_schema.contains(name) {
            return Err(Error::value_not_found(name));
        }
        Ok(self
            .listeners
            .borrow_mut()
            .add_value_listener(name, callback))
    }

    /// Removes a listener. Takes effect immediately, even mid-dispatch.
    ///
    /// Returns false if the listener was already removed.
    pub fn del_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // ---- commit and dispatch ----

    /// Runs one write against the state and commits its journal.
    ///
    /// `f` must validate before mutating; on error nothing was changed and
    /// nothing fires.
    fn mutate<T, F>(&self, op: &'static str, target: Option<&str>, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState, &mut Journal) -> Result<T>,
    {
        let mut journal = Journal::new();
        let output = {
            let mut state = self.state.borrow_mut();
            let output = f(&mut *state, &mut journal)?;
            if !journal.is_empty() {
                state.written = true;
            }
            output
        };

        let noop = target.filter(|table| {
            self.config.notifies_on_noop()
                && journal
                    .get_table_diff(table)
                    .map_or(true, |diff| diff.is_empty())
        });
        if journal.has_net_changes() {
            debug!(
                op,
                entries = journal.get_entries().len(),
                tables = journal.changed_tables().count(),
                "committed"
            );
        }
        self.commit(journal, noop);
        Ok(output)
    }

    /// Dispatches a journal, or parks it in the open transaction.
    pub(crate) fn commit(&self, journal: Journal, noop: Option<&str>) {
        {
            let mut batch = self.batch.borrow_mut();
            if let Some(batch) = batch.as_mut() {
                batch.journal.extend(journal);
                batch.noop_tables.extend(noop.map(str::to_string));
                return;
            }
        }
        let noop_tables: BTreeSet<String> = noop.map(str::to_string).into_iter().collect();
        self.dispatch(&journal, &noop_tables);
    }

    /// Restores the state a journal started from.
    pub(crate) fn rollback(&self, journal: Journal) {
        let mut state = self.state.borrow_mut();
        let StoreState { tables, values, .. } = &mut *state;
        journal.rollback(tables, values);
    }

    /// Notifies table, row and value listeners of a journal's net changes.
    ///
    /// No borrow of the state or the registry is held while a callback runs.
    pub(crate) fn dispatch(&self, journal: &Journal, noop_tables: &BTreeSet<String>) {
        let mut change_sets: Vec<ChangeSet> =
            journal.changed_tables().map(ChangeSet::from_diff).collect();
        for table in noop_tables {
            if !change_sets.iter().any(|cs| &cs.table == table) {
                change_sets.push(ChangeSet::new(table.as_str()));
            }
        }
        let value_changes: Vec<ValueChange> = journal
            .changed_values()
            .map(|(name, old, new)| ValueChange {
                name: name.to_string(),
                old: old.clone(),
                new: new.clone(),
            })
            .collect();
        if change_sets.is_empty() && value_changes.is_empty() {
            return;
        }

        let depth = self.notify_depth.get();
        if let Some(limit) = self.config.notify_depth_limit() {
            if depth >= limit {
                warn!(depth, limit, "notification depth limit reached, skipping dispatch");
                return;
            }
        }
        self.notify_depth.set(depth + 1);
        let _depth = DepthGuard(&self.notify_depth);

        for change_set in &change_sets {
            self.dispatch_table(change_set);
        }
        for change in &value_changes {
            let callbacks = self.listeners.borrow().value_callbacks(&change.name);
            trace!(value = %change.name, listeners = callbacks.len(), "dispatching value change");
            for (id, callback) in callbacks {
                if self.is_live(id) {
                    callback(change);
                }
            }
        }
    }

    fn dispatch_table(&self, change_set: &ChangeSet) {
        let callbacks = self.listeners.borrow().table_callbacks(&change_set.table);
        trace!(
            table = %change_set.table,
            rows = change_set.len(),
            listeners = callbacks.len(),
            "dispatching table change"
        );
        for (id, callback) in callbacks {
            if self.is_live(id) {
                callback(change_set);
            }
        }

        for row_id in change_set.row_ids() {
            let callbacks = self
                .listeners
                .borrow()
                .row_callbacks(&change_set.table, row_id);
            if callbacks.is_empty() {
                continue;
            }
            let row_change = change_set.restrict_to(row_id);
            for (id, callback) in callbacks {
                if self.is_live(id) {
                    callback(&row_change);
                }
            }
        }
    }

    /// A listener removed by an earlier callback in the same dispatch is
    /// skipped.
    fn is_live(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains(id)
    }
}

/// Restores the dispatch depth, also while unwinding.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}
