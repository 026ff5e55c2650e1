//! Schema module for Tabulon.
//!
//! This module contains the table and value definitions a store is bound to.
//! Schemas are immutable once built.

mod column;
mod table;
mod values;

pub use column::ColumnSchema;
pub use table::{TableSchema, TableSchemaBuilder, TablesSchema};
pub use values::{ValuesSchema, ValuesSchemaBuilder};
