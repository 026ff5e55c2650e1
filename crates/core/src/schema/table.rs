//! Table definitions for Tabulon schemas.

use std::collections::BTreeMap;

use super::column::ColumnSchema;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::types::CellType;
use crate::value::Value;

/// Validates a table, column or value name.
pub(crate) fn check_naming_rules(name: &str) -> Result<()> {
    let Some(first) = name.chars().next() else {
        return Err(Error::invalid_schema("Name cannot be empty"));
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(Error::invalid_schema(format!(
            "Name must start with letter or underscore: {}",
            name
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::invalid_schema(format!(
            "Name contains invalid characters: {}",
            name
        )));
    }
    Ok(())
}

/// A table definition: name plus typed columns in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns.
    #[inline]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    /// Gets a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Checks a single cell against its column.
    pub fn check_cell(&self, column: &str, value: &Value) -> Result<()> {
        let col = self
            .get_column(column)
            .ok_or_else(|| Error::column_not_found(&self.name, column))?;
        col.check(&format!("{}.{}", self.name, column), value)
    }

    /// Checks every cell of a (possibly partial) row.
    pub fn check_cells(&self, row: &Row) -> Result<()> {
        for (column, value) in row.iter() {
            self.check_cell(column, value)?;
        }
        Ok(())
    }

    /// Validates a full row and returns it with defaults filled in.
    pub fn conform_row(&self, row: &Row) -> Result<Row> {
        self.check_cells(row)?;
        self.fill_defaults(row.clone())
    }

    /// Merges `partial` over `existing` (or over the defaults when the row
    /// does not exist yet) and validates the result.
    pub fn merge_row(&self, existing: Option<&Row>, partial: &Row) -> Result<Row> {
        self.check_cells(partial)?;
        let mut merged = existing.cloned().unwrap_or_default();
        merged.merge(partial);
        self.fill_defaults(merged)
    }

    fn fill_defaults(&self, mut row: Row) -> Result<Row> {
        for col in &self.columns {
            if row.contains(col.name()) {
                continue;
            }
            match col.get_default_value() {
                Some(default) => {
                    row.set(col.name(), default.clone());
                }
                None => return Err(Error::missing_column(&self.name, col.name())),
            }
        }
        Ok(row)
    }
}

/// Builder for creating table definitions.
pub struct TableSchemaBuilder {
    name: String,
    columns: Vec<ColumnSchema>,
}

impl TableSchemaBuilder {
    /// Creates a new table builder.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_naming_rules(&name)?;
        Ok(Self {
            name,
            columns: Vec::new(),
        })
    }

    /// Adds a required column.
    pub fn add_column(self, name: impl Into<String>, cell_type: CellType) -> Result<Self> {
        self.push(ColumnSchema::new(name, cell_type))
    }

    /// Adds a column that falls back to `default` when a write omits it.
    pub fn add_column_with_default(
        self,
        name: impl Into<String>,
        cell_type: CellType,
        default: impl Into<Value>,
    ) -> Result<Self> {
        let column = ColumnSchema::new(name, cell_type).default_value(default)?;
        self.push(column)
    }

    fn push(mut self, column: ColumnSchema) -> Result<Self> {
        check_naming_rules(column.name())?;
        if self.columns.iter().any(|c| c.name() == column.name()) {
            return Err(Error::invalid_schema(format!(
                "Column already exists: {}",
                column.name()
            )));
        }
        self.columns.push(column);
        Ok(self)
    }

    /// Builds the table definition.
    pub fn build(self) -> Result<TableSchema> {
        if self.columns.is_empty() {
            return Err(Error::invalid_schema(format!(
                "Table has no columns: {}",
                self.name
            )));
        }
        Ok(TableSchema {
            name: self.name,
            columns: self.columns,
        })
    }
}

/// The set of table definitions bound to a store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TablesSchema {
    tables: BTreeMap<String, TableSchema>,
}

impl TablesSchema {
    /// Creates an empty tables schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, failing on duplicate names.
    pub fn add_table(&mut self, table: TableSchema) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(Error::invalid_schema(format!(
                "Table already exists: {}",
                table.name()
            )));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Builder-style `add_table`.
    pub fn with_table(mut self, table: TableSchema) -> Result<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    /// Gets a table definition by name.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Returns all table names.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Iterates over the table definitions.
    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> + '_ {
        self.tables.values()
    }

    /// Returns the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table is declared.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableSchema {
        TableSchemaBuilder::new("users")
            .unwrap()
            .add_column("name", CellType::String)
            .unwrap()
            .add_column_with_default("age", CellType::Number, 0)
            .unwrap()
            .add_column_with_default("isActive", CellType::Boolean, true)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_table_builder() {
        let table = users();
        assert_eq!(table.name(), "users");
        assert_eq!(table.columns().len(), 3);
        assert!(table.get_column("age").unwrap().has_default());
        assert!(table.get_column("unknown").is_none());
    }

    #[test]
    fn test_invalid_names() {
        assert!(TableSchemaBuilder::new("").is_err());
        assert!(TableSchemaBuilder::new("user-prefs").is_err());
        assert!(TableSchemaBuilder::new("userPreferences").is_ok());

        let result = TableSchemaBuilder::new("test")
            .unwrap()
            .add_column("123invalid", CellType::Number);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_column() {
        let result = TableSchemaBuilder::new("test")
            .unwrap()
            .add_column("id", CellType::String)
            .unwrap()
            .add_column("id", CellType::Number);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(TableSchemaBuilder::new("empty").unwrap().build().is_err());
    }

    #[test]
    fn test_conform_row_fills_defaults() {
        let row = users().conform_row(&Row::new().with("name", "Alice")).unwrap();
        assert_eq!(row.get_str("name"), Some("Alice"));
        assert_eq!(row.get_f64("age"), Some(0.0));
        assert_eq!(row.get_bool("isActive"), Some(true));
    }

    #[test]
    fn test_conform_row_errors() {
        let table = users();

        let err = table.conform_row(&Row::new().with("age", 3)).unwrap_err();
        assert_eq!(err, Error::missing_column("users", "name"));

        let err = table
            .conform_row(&Row::new().with("name", "A").with("age", "old"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::type_mismatch("users.age", CellType::Number, CellType::String)
        );

        let err = table
            .conform_row(&Row::new().with("name", "A").with("nickname", "a"))
            .unwrap_err();
        assert_eq!(err, Error::column_not_found("users", "nickname"));
    }

    #[test]
    fn test_merge_row_preserves_untouched() {
        let table = users();
        let existing = table
            .conform_row(&Row::new().with("name", "Alice").with("age", 28))
            .unwrap();
        let merged = table
            .merge_row(Some(&existing), &Row::new().with("isActive", false))
            .unwrap();
        assert_eq!(merged.get_str("name"), Some("Alice"));
        assert_eq!(merged.get_f64("age"), Some(28.0));
        assert_eq!(merged.get_bool("isActive"), Some(false));
    }

    #[test]
    fn test_merge_row_creates_from_defaults() {
        let table = users();
        assert!(table.merge_row(None, &Row::new().with("age", 1)).is_err());
        let row = table.merge_row(None, &Row::new().with("name", "Bob")).unwrap();
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_tables_schema_duplicates() {
        let schema = TablesSchema::new().with_table(users()).unwrap();
        assert_eq!(schema.table_names(), vec!["users"]);
        assert!(schema.with_table(users()).is_err());
    }
}
