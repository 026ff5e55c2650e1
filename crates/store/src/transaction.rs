//! Transactions for grouped store operations.
//!
//! Writes inside a transaction apply immediately, so reads within it see
//! them, but notification is deferred until the outermost transaction ends.
//! Each table, row and value listener then fires at most once with the net
//! change. If the transaction fails, every write is rolled back and nothing
//! fires.

use tabulon_core::Result;
use tracing::debug;

use crate::store::{Batch, Store};

impl Store {
    /// Runs `f` as one transaction.
    ///
    /// Returning `Err` from `f` rolls back every table and value to its state
    /// when the transaction started. A panic inside `f` rolls back as well.
    /// A transaction opened inside another joins it: only the outermost
    /// commits or rolls back.
    ///
    /// # Example
    ///
    /// ```
    /// use tabulon_core::schema::{TableSchemaBuilder, TablesSchema};
    /// use tabulon_core::{CellType, Error, Row};
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
    /// let result: Result<(), Error> = store.transaction(|store| {
    ///     store.set_row("users", "user-1", Row::new().with("name", "Alice"))?;
    ///     store.set_row("users", "user-2", Row::new().with("name", 42))
    /// });
    /// assert!(result.is_err());
    /// assert_eq!(store.row_count("users").unwrap(), 0);
    /// ```
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T>,
    {
        {
            let mut batch = self.batch.borrow_mut();
            if batch.is_some() {
                drop(batch);
                return f(self);
            }
            *batch = Some(Batch::default());
        }

        let guard = RollbackOnUnwind(self);
        let result = f(self);
        let batch = self.batch.borrow_mut().take();
        drop(guard);

        let Some(batch) = batch else {
            return result;
        };
        match result {
            Ok(output) => {
                debug!(
                    entries = batch.journal.get_entries().len(),
                    "transaction committed"
                );
                self.dispatch(&batch.journal, &batch.noop_tables);
                Ok(output)
            }
            Err(err) => {
                debug!(
                    entries = batch.journal.get_entries().len(),
                    error = %err,
                    "transaction rolled back"
                );
                self.rollback(batch.journal);
                Err(err)
            }
        }
    }

    /// Returns true while a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.batch.borrow().is_some()
    }
}

/// Rolls back an open transaction if its closure panics.
struct RollbackOnUnwind<'a>(&'a Store);

impl Drop for RollbackOnUnwind<'_> {
    fn drop(&mut self) {
        let batch = self.0.batch.borrow_mut().take();
        if let Some(batch) = batch {
            self.0.rollback(batch.journal);
        }
    }
}
