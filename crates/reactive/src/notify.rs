//! Listener registry and routing.
//!
//! This module provides `ListenerRegistry`, which owns every registered
//! listener and hands out callback handles for a given table, row or value.
//! Handles are cloned out so the caller can invoke them after releasing any
//! borrow on the registry; callbacks are then free to register or remove
//! listeners themselves.

use hashbrown::HashMap;

use crate::change_set::{ChangeSet, ValueChange};
use crate::subscription::{ChangeCallback, Listener, ListenerId, ListenerTarget, ValueCallback};

/// A registry that tracks listeners and routes changes to them.
///
/// # Example
///
/// ```
/// use tabulon_reactive::{ChangeSet, ListenerRegistry};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let mut registry = ListenerRegistry::new();
/// let hits = Rc::new(Cell::new(0));
/// let hits_clone = hits.clone();
/// let id = registry.add_table_listener("users", move |_| hits_clone.set(hits_clone.get() + 1));
///
/// for (_, callback) in registry.table_callbacks("users") {
///     callback(&ChangeSet::new("users"));
/// }
/// assert_eq!(hits.get(), 1);
/// assert!(registry.remove(id));
/// assert!(!registry.remove(id));
/// ```
pub struct ListenerRegistry {
    /// Listener ID -> listener
    listeners: HashMap<ListenerId, Listener>,
    /// Next listener ID to assign
    next_id: ListenerId,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerRegistry {
    /// Creates a new listener registry.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Registers a listener for every change to a table.
    pub fn add_table_listener<F>(&mut self, table: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let id = self.allocate_id();
        let target = ListenerTarget::Table(table.into());
        self.listeners
            .insert(id, Listener::on_change(id, target, callback));
        id
    }

    /// Registers a listener for changes to one row.
    pub fn add_row_listener<F>(
        &mut self,
        table: impl Into<String>,
        row_id: impl Into<String>,
        callback: F,
    ) -> ListenerId
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let id = self.allocate_id();
        let target = ListenerTarget::Row {
            table: table.into(),
            row_id: row_id.into(),
        };
        self.listeners
            .insert(id, Listener::on_change(id, target, callback));
        id
    }

    /// Registers a listener for changes to one value.
    pub fn add_value_listener<F>(&mut self, name: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&ValueChange) + 'static,
    {
        let id = self.allocate_id();
        self.listeners.insert(id, Listener::on_value(id, name, callback));
        id
    }

    /// Unregisters a listener by ID.
    ///
    /// Returns true if the listener was found and removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Returns true if the listener is still registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Returns the callbacks of every listener on a table, oldest first.
    pub fn table_callbacks(&self, table: &str) -> Vec<(ListenerId, ChangeCallback)> {
        self.change_callbacks(|target| matches!(target, ListenerTarget::Table(t) if t == table))
    }

    /// Returns the callbacks of every listener on one row, oldest first.
    pub fn row_callbacks(&self, table: &str, row_id: &str) -> Vec<(ListenerId, ChangeCallback)> {
        self.change_callbacks(|target| {
            matches!(target, ListenerTarget::Row { table: t, row_id: r } if t == table && r == row_id)
        })
    }

    /// Returns the callbacks of every listener on a value, oldest first.
    pub fn value_callbacks(&self, name: &str) -> Vec<(ListenerId, ValueCallback)> {
        let mut callbacks: Vec<(ListenerId, ValueCallback)> = self
            .listeners
            .values()
            .filter(|l| matches!(l.target(), ListenerTarget::Value(n) if n == name))
            .filter_map(|l| l.value_callback().map(|cb| (l.id(), cb)))
            .collect();
        callbacks.sort_by_key(|(id, _)| *id);
        callbacks
    }

    fn change_callbacks<P>(&self, predicate: P) -> Vec<(ListenerId, ChangeCallback)>
    where
        P: Fn(&ListenerTarget) -> bool,
    {
        let mut callbacks: Vec<(ListenerId, ChangeCallback)> = self
            .listeners
            .values()
            .filter(|l| predicate(l.target()))
            .filter_map(|l| l.change_callback().map(|cb| (l.id(), cb)))
            .collect();
        callbacks.sort_by_key(|(id, _)| *id);
        callbacks
    }

    /// Returns the number of registered listeners.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if there are no listeners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
