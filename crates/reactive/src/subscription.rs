//! Listener definitions.
//!
//! This module provides listener IDs, the callback types, and the
//! `Listener` record stored by the registry.

use std::rc::Rc;

use crate::change_set::{ChangeSet, ValueChange};

/// Unique identifier for a registered listener.
pub type ListenerId = u64;

/// Callback type for table and row change notifications.
pub type ChangeCallback = Rc<dyn Fn(&ChangeSet)>;

/// Callback type for value change notifications.
pub type ValueCallback = Rc<dyn Fn(&ValueChange)>;

/// What a listener observes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// Every row of a table.
    Table(String),
    /// One row of a table.
    Row { table: String, row_id: String },
    /// One standalone value.
    Value(String),
}

pub(crate) enum Callback {
    Change(ChangeCallback),
    Value(ValueCallback),
}

/// A registered listener.
pub struct Listener {
    /// Unique identifier
    id: ListenerId,
    /// What this listener observes
    target: ListenerTarget,
    /// Callback to invoke on changes
    callback: Callback,
}

impl Listener {
    /// Creates a change listener for a table or row target.
    pub fn on_change<F>(id: ListenerId, target: ListenerTarget, callback: F) -> Self
    where
        F: Fn(&ChangeSet) + 'static,
    {
        Self {
            id,
            target,
            callback: Callback::Change(Rc::new(callback)),
        }
    }

    /// Creates a value listener.
    pub fn on_value<F>(id: ListenerId, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&ValueChange) + 'static,
    {
        Self {
            id,
            target: ListenerTarget::Value(name.into()),
            callback: Callback::Value(Rc::new(callback)),
        }
    }

    /// Returns the listener ID.
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns what this listener observes.
    #[inline]
    pub fn target(&self) -> &ListenerTarget {
        &self.target
    }

    /// Returns a shared handle to the change callback, if this is one.
    pub fn change_callback(&self) -> Option<ChangeCallback> {
        match &self.callback {
            Callback::Change(cb) => Some(Rc::clone(cb)),
            Callback::Value(_) => None,
        }
    }

    /// Returns a shared handle to the value callback, if this is one.
    pub fn value_callback(&self) -> Option<ValueCallback> {
        match &self.callback {
            Callback::Value(cb) => Some(Rc::clone(cb)),
            Callback::Change(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_listener_new() {
        let listener = Listener::on_change(1, ListenerTarget::Table("users".into()), |_| {});
        assert_eq!(listener.id(), 1);
        assert_eq!(listener.target(), &ListenerTarget::Table("users".into()));
        assert!(listener.change_callback().is_some());
        assert!(listener.value_callback().is_none());
    }

    #[test]
    fn test_listener_notify() {
        let called = Rc::new(RefCell::new(0));
        let called_clone = called.clone();

        let listener = Listener::on_change(1, ListenerTarget::Table("users".into()), move |cs| {
            *called_clone.borrow_mut() += cs.len();
        });

        let mut changes = ChangeSet::new("users");
        changes.added.push("u1".into());
        (listener.change_callback().unwrap())(&changes);

        assert_eq!(*called.borrow(), 1);
    }

    #[test]
    fn test_value_listener() {
        let listener = Listener::on_value(7, "isLoggedIn", |_| {});
        assert_eq!(listener.target(), &ListenerTarget::Value("isLoggedIn".into()));
        assert!(listener.value_callback().is_some());
    }
}
