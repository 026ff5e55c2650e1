//! Error types for Tabulon.

use thiserror::Error;

use crate::types::CellType;

/// Result type alias for Tabulon operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for store operations.
///
/// Absence on read is never an error; lookups of a missing row or unset
/// value return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A cell or value does not have the declared type.
    #[error("Type mismatch on {target}: expected {expected}, got {got}")]
    TypeMismatch {
        target: String,
        expected: CellType,
        got: CellType,
    },
    /// A row is missing a column that has no default.
    #[error("Missing required column {column} in table {table}")]
    MissingColumn { table: String, column: String },
    /// A number cell or value is NaN or infinite.
    #[error("Non-finite number on {target}")]
    NonFiniteNumber { target: String },
    /// Table not declared by the schema.
    #[error("Table not found: {name}")]
    TableNotFound { name: String },
    /// Column not declared by the table schema.
    #[error("Column {column} not found in table {table}")]
    ColumnNotFound { table: String, column: String },
    /// Value not declared by the values schema.
    #[error("Value not found: {name}")]
    ValueNotFound { name: String },
    /// Invalid schema definition.
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },
    /// Schema rebinding attempted after data was written.
    #[error("Schema locked: {message}")]
    SchemaLocked { message: String },
    /// Malformed JSON import.
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
    /// A row could not be converted into a typed record.
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(target: impl Into<String>, expected: CellType, got: CellType) -> Self {
        Error::TypeMismatch {
            target: target.into(),
            expected,
            got,
        }
    }

    /// Creates a missing column error.
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a non-finite number error.
    pub fn non_finite(target: impl Into<String>) -> Self {
        Error::NonFiniteNumber {
            target: target.into(),
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::TableNotFound { name: name.into() }
    }

    /// Creates a column not found error.
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a value not found error.
    pub fn value_not_found(name: impl Into<String>) -> Self {
        Error::ValueNotFound { name: name.into() }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates a schema locked error.
    pub fn schema_locked(message: impl Into<String>) -> Self {
        Error::SchemaLocked {
            message: message.into(),
        }
    }

    /// Creates an invalid JSON error.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Error::InvalidJson {
            message: message.into(),
        }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Error::InvalidRecord {
            message: message.into(),
        }
    }

    /// Returns true for errors raised because written data breaks the schema.
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. } | Error::MissingColumn { .. } | Error::NonFiniteNumber { .. }
        )
    }

    /// Returns true for errors raised because a name is not in the schema.
    pub fn is_unknown_name(&self) -> bool {
        matches!(
            self,
            Error::TableNotFound { .. } | Error::ColumnNotFound { .. } | Error::ValueNotFound { .. }
        )
    }
}
