//! Standalone value definitions.

use std::collections::BTreeMap;

use super::column::ColumnSchema;
use super::table::check_naming_rules;
use crate::error::{Error, Result};
use crate::types::CellType;
use crate::value::Value;

/// Typed declarations for the store's top-level values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValuesSchema {
    values: BTreeMap<String, ColumnSchema>,
}

impl ValuesSchema {
    /// Creates an empty values schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value definition by name.
    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.values.get(name)
    }

    /// Returns true if the name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Checks a write to the named value.
    pub fn check(&self, name: &str, value: &Value) -> Result<()> {
        let def = self.get(name).ok_or_else(|| Error::value_not_found(name))?;
        def.check(name, value)
    }

    /// Returns the schema default of the named value.
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(|d| d.get_default_value())
    }

    /// Returns all declared names.
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(|s| s.as_str()).collect()
    }

    /// Iterates over `(name, default)` for values that declare one.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values
            .iter()
            .filter_map(|(name, def)| def.get_default_value().map(|v| (name.as_str(), v)))
    }

    /// Returns the number of declared values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no value is declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for creating values schemas.
#[derive(Default)]
pub struct ValuesSchemaBuilder {
    values: BTreeMap<String, ColumnSchema>,
}

impl ValuesSchemaBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a value without a default.
    pub fn add_value(self, name: impl Into<String>, cell_type: CellType) -> Result<Self> {
        self.push(ColumnSchema::new(name, cell_type))
    }

    /// Declares a value with a default.
    pub fn add_value_with_default(
        self,
        name: impl Into<String>,
        cell_type: CellType,
        default: impl Into<Value>,
    ) -> Result<Self> {
        let def = ColumnSchema::new(name, cell_type).default_value(default)?;
        self.push(def)
    }

    fn push(mut self, def: ColumnSchema) -> Result<Self> {
        check_naming_rules(def.name())?;
        if self.values.contains_key(def.name()) {
            return Err(Error::invalid_schema(format!(
                "Value already exists: {}",
                def.name()
            )));
        }
        self.values.insert(def.name().to_string(), def);
        Ok(self)
    }

    /// Builds the values schema.
    pub fn build(self) -> ValuesSchema {
        ValuesSchema {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ValuesSchema {
        ValuesSchemaBuilder::new()
            .add_value("currentUserId", CellType::String)
            .unwrap()
            .add_value_with_default("isLoggedIn", CellType::Boolean, false)
            .unwrap()
            .build()
    }

    #[test]
    fn test_values_schema_defaults() {
        let schema = schema();
        assert_eq!(schema.default_for("isLoggedIn"), Some(&Value::Boolean(false)));
        assert_eq!(schema.default_for("currentUserId"), None);
        assert_eq!(schema.default_for("unknown"), None);
        assert_eq!(schema.defaults().count(), 1);
    }

    #[test]
    fn test_values_schema_check() {
        let schema = schema();
        assert!(schema.check("isLoggedIn", &Value::from(true)).is_ok());
        assert!(schema.check("isLoggedIn", &Value::from("yes")).unwrap_err().is_schema_violation());
        assert_eq!(
            schema.check("theme", &Value::from("dark")).unwrap_err(),
            Error::value_not_found("theme")
        );
    }

    #[test]
    fn test_values_schema_duplicate() {
        let result = ValuesSchemaBuilder::new()
            .add_value("a", CellType::String)
            .unwrap()
            .add_value("a", CellType::Number);
        assert!(result.is_err());
    }
}
