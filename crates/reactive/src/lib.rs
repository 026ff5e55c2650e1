//! Tabulon Reactive - Change notification for the Tabulon store.
//!
//! This crate implements the listener side of the store. When a committed
//! operation changes a table or a value, the store builds a `ChangeSet` (or
//! `ValueChange`) and invokes the callbacks the `ListenerRegistry` returns
//! for it, synchronously and in registration order.
//!
//! # Core Concepts
//!
//! - `ChangeSet`: Row ids added, updated and removed in one table
//! - `ValueChange`: Old and new value of one standalone value, as read
//! - `Listener`: A registered callback and the target it observes
//! - `ListenerRegistry`: Owns listeners and routes changes to them

pub mod change_set;
pub mod notify;
pub mod subscription;

pub use change_set::{ChangeSet, ValueChange};
pub use notify::ListenerRegistry;
pub use subscription::{ChangeCallback, Listener, ListenerId, ListenerTarget, ValueCallback};
