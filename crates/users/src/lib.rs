//! Tabulon Users - User directory on top of the Tabulon store.
//!
//! This crate provides:
//!
//! - `schema`: the `users` / `userPreferences` tables and the standalone values
//! - `seed`: mock users, preferences and values
//! - `records`: typed `User` / `UserPreference` views of rows
//! - `UserStore`: named directory operations (listing, adding, updating,
//!   cascading deletes, login state)
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tabulon_core::Row;
//! use tabulon_users::{schema, UserStore};
//!
//! let users = UserStore::initialize().unwrap();
//! let renders = Rc::new(Cell::new(0));
//! let renders_clone = renders.clone();
//! let _subscription = users
//!     .store()
//!     .subscribe_table(schema::USERS, move |_| renders_clone.set(renders_clone.get() + 1))
//!     .unwrap();
//!
//! users.update_user("user-3", Row::new().with("isActive", true)).unwrap();
//! assert_eq!(renders.get(), 1);
//! assert_eq!(users.get_active_users().unwrap().len(), 3);
//! ```

mod helpers;
pub mod records;
pub mod schema;
pub mod seed;

pub use helpers::{UserStore, USER_ID_PREFIX};
pub use records::{User, UserPreference};
