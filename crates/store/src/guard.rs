//! Scoped listener registration.

use std::rc::{Rc, Weak};

use tabulon_core::Result;
use tabulon_reactive::{ChangeSet, ListenerId, ValueChange};

use crate::store::Store;

/// A listener registration that is removed when dropped.
///
/// The guard holds a weak reference, so it never keeps the store alive.
/// Dropping it after the store is gone does nothing.
///
/// ```
/// use std::rc::Rc;
/// use tabulon_core::schema::{TableSchemaBuilder, TablesSchema};
/// use tabulon_core::CellType;
/// use tabulon_store::Store;
///
/// let users = TableSchemaBuilder::new("users")
///     .unwrap()
///     .add_column("name", CellType::String)
///     .unwrap()
///     .build()
///     .unwrap();
/// let store = Rc::new(Store::new());
/// store.set_tables_schema(TablesSchema::new().with_table(users).unwrap()).unwrap();
///
/// {
///     let _subscription = store.subscribe_table("users", |_| {}).unwrap();
///     assert_eq!(store.listener_count(), 1);
/// }
/// assert_eq!(store.listener_count(), 0);
/// ```
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    store: Weak<Store>,
    id: ListenerId,
    active: bool,
}

impl Subscription {
    fn new(store: &Rc<Store>, id: ListenerId) -> Self {
        Self {
            store: Rc::downgrade(store),
            id,
            active: true,
        }
    }

    /// Returns the underlying listener ID.
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unregisters now. Returns false if the listener was already gone.
    pub fn cancel(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }
        match self.store.upgrade() {
            Some(store) => store.del_listener(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl Store {
    /// Registers a table listener scoped to the returned guard.
    pub fn subscribe_table<F>(self: &Rc<Self>, table: &str, callback: F) -> Result<Subscription>
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let id = self.add_table_listener(table, callback)?;
        Ok(Subscription::new(self, id))
    }

    /// Registers a row listener scoped to the returned guard.
    pub fn subscribe_row<F>(
        self: &Rc<Self>,
        table: &str,
        row_id: &str,
        callback: F,
    ) -> Result<Subscription>
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let id = self.add_row_listener(table, row_id, callback)?;
        Ok(Subscription::new(self, id))
    }

    /// Registers a value listener scoped to the returned guard.
    pub fn subscribe_value<F>(self: &Rc<Self>, name: &str, callback: F) -> Result<Subscription>
    where
        F: Fn(&ValueChange) + 'static,
    {
        let id = self.add_value_listener(name, callback)?;
        Ok(Subscription::new(self, id))
    }
}
