//! Tabulon Storage - Storage layer for the Tabulon reactive store.
//!
//! This crate provides the storage layer including:
//!
//! - `RowStore`: Schema-checked row storage for one table
//! - `TableCache`: Multi-table management and wholesale replacement
//! - `ValueStore`: Typed storage for standalone values
//! - `Journal`: Change tracking for notifications and rollback
//!
//! # Example
//!
//! ```rust
//! use tabulon_storage::{Journal, TableCache};
//! use tabulon_core::schema::{TableSchemaBuilder, TablesSchema};
//! use tabulon_core::{CellType, Row};
//!
//! let users = TableSchemaBuilder::new("users")
//!     .unwrap()
//!     .add_column("name", CellType::String)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let mut cache = TableCache::new(&TablesSchema::new().with_table(users).unwrap());
//!
//! let mut journal = Journal::new();
//! let write = cache
//!     .get_table_mut("users")
//!     .unwrap()
//!     .set_row("user-1", &Row::new().with("name", "Alice"))
//!     .unwrap();
//! journal.record_write("users", "user-1", write);
//!
//! assert_eq!(cache.get_table("users").unwrap().len(), 1);
//! assert!(journal.has_net_changes());
//! ```

pub mod cache;
pub mod journal;
pub mod row_store;
pub mod values;

pub use cache::{TableCache, TableWrite};
pub use journal::{Journal, JournalEntry, TableDiff};
pub use row_store::{RowStore, RowWrite};
pub use values::{ValueStore, ValueWrite};
