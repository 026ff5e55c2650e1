//! Cell type definitions for Tabulon.
//!
//! Every table cell and every standalone value carries exactly one of these
//! types, fixed by the schema for the lifetime of the store.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Supported cell types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// UTF-8 string
    String,
    /// Finite 64-bit floating point number
    Number,
    /// Boolean (true/false)
    Boolean,
}

impl CellType {
    /// Returns the lowercase schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::String => "string",
            CellType::Number => "number",
            CellType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(CellType::String),
            "number" => Ok(CellType::Number),
            "boolean" => Ok(CellType::Boolean),
            other => Err(Error::invalid_schema(format!("Unknown cell type: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_type_equality() {
        assert_eq!(CellType::String, CellType::String);
        assert_ne!(CellType::String, CellType::Number);
    }

    #[test]
    fn test_cell_type_parse() {
        assert_eq!("string".parse::<CellType>().unwrap(), CellType::String);
        assert_eq!("number".parse::<CellType>().unwrap(), CellType::Number);
        assert_eq!("boolean".parse::<CellType>().unwrap(), CellType::Boolean);
        assert!("integer".parse::<CellType>().is_err());
    }

    #[test]
    fn test_cell_type_display_roundtrip() {
        for ty in [CellType::String, CellType::Number, CellType::Boolean] {
            assert_eq!(ty.to_string().parse::<CellType>().unwrap(), ty);
        }
    }
}
