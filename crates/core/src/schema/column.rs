//! Column definition for Tabulon schemas.
//!
//! The same definition describes a table column and a standalone value.

use crate::error::{Error, Result};
use crate::types::CellType;
use crate::value::Value;

/// A column (or standalone value) definition.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSchema {
    /// Column name.
    name: String,
    /// Cell type accepted by the column.
    cell_type: CellType,
    /// Default used when a write does not supply the cell.
    default_value: Option<Value>,
}

impl ColumnSchema {
    /// Creates a new column definition without a default.
    pub fn new(name: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            name: name.into(),
            cell_type,
            default_value: None,
        }
    }

    /// Sets the default value for this column.
    ///
    /// Fails when the default does not match the column type.
    pub fn default_value(mut self, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        self.check(&self.name, &value)
            .map_err(|e| Error::invalid_schema(format!("Bad default for {}: {}", self.name, e)))?;
        self.default_value = Some(value);
        Ok(self)
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cell type.
    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Returns the declared default, if any.
    #[inline]
    pub fn get_default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Returns whether a write may omit this column.
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Checks a value against this column; `target` names it in errors.
    pub fn check(&self, target: &str, value: &Value) -> Result<()> {
        if value.cell_type() != self.cell_type {
            return Err(Error::type_mismatch(target, self.cell_type, value.cell_type()));
        }
        if !value.is_finite() {
            return Err(Error::non_finite(target));
        }
        Ok(())
    }
}
