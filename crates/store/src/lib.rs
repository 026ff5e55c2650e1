//! Tabulon Store - Schema-enforced in-memory reactive tabular store.
//!
//! This crate provides the `Store` facade over the storage and reactive
//! layers:
//!
//! - Schema binding for tables and standalone values
//! - Point reads and writes, partial updates, bulk replacement
//! - Synchronous table, row and value listeners
//! - Transactions with coalesced notification and rollback
//! - JSON import and export
//! - `Subscription` guards that unregister on drop
//!
//! # Example
//!
//! ```rust
//! use tabulon_core::schema::{TableSchemaBuilder, TablesSchema, ValuesSchemaBuilder};
//! use tabulon_core::{CellType, Row, Value};
//! use tabulon_store::{Store, StoreConfig};
//!
//! let users = TableSchemaBuilder::new("users")
//!     .unwrap()
//!     .add_column("name", CellType::String)
//!     .unwrap()
//!     .add_column_with_default("isActive", CellType::Boolean, true)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let values = ValuesSchemaBuilder::new()
//!     .add_value_with_default("isLoggedIn", CellType::Boolean, false)
//!     .unwrap()
//!     .build();
//!
//! let store = Store::with_config(StoreConfig::new().row_id_start(1));
//! store.set_tables_schema(TablesSchema::new().with_table(users).unwrap()).unwrap();
//! store.set_values_schema(values).unwrap();
//!
//! let id = store.add_row("users", Row::new().with("name", "Alice")).unwrap();
//! assert_eq!(id, "1");
//! assert_eq!(
//!     store.get_cell("users", &id, "isActive").unwrap(),
//!     Some(Value::Boolean(true))
//! );
//! assert_eq!(store.get_value("isLoggedIn").unwrap(), Some(Value::Boolean(false)));
//! ```

mod config;
mod guard;
mod json;
mod store;
mod transaction;

pub use config::StoreConfig;
pub use guard::Subscription;
pub use store::Store;

pub use tabulon_core::{Error, Result};
pub use tabulon_reactive::{ChangeSet, ListenerId, ValueChange};
