//! Tabulon Core - Core types and schema definitions for the Tabulon store.
//!
//! This crate provides the foundational types for the Tabulon in-memory
//! reactive store:
//!
//! - `CellType`: Supported cell types (String, Number, Boolean)
//! - `Value`: Runtime scalars stored in cells and standalone values
//! - `Row`: A record keyed by column name
//! - `schema`: Schema definitions (ColumnSchema, TableSchema, ValuesSchema)
//! - `Error`: Error types for store operations
//!
//! # Example
//!
//! ```rust
//! use tabulon_core::{CellType, Row, Value};
//! use tabulon_core::schema::TableSchemaBuilder;
//!
//! let table = TableSchemaBuilder::new("users")
//!     .unwrap()
//!     .add_column("name", CellType::String)
//!     .unwrap()
//!     .add_column_with_default("isActive", CellType::Boolean, true)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let row = table.conform_row(&Row::new().with("name", "Alice")).unwrap();
//! assert_eq!(row.get("isActive"), Some(&Value::Boolean(true)));
//! ```

mod error;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::{Row, RowId, TableData};
pub use types::CellType;
pub use value::Value;
