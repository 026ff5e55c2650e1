//! JSON import and export.
//!
//! The document format is a two-element array `[tables, values]`, where
//! `tables` maps table name to row id to row, and `values` maps value name to
//! value.

use std::collections::BTreeMap;

use tabulon_core::{Error, Result, TableData, Value};

use crate::store::Store;

type Tables = BTreeMap<String, TableData>;
type Values = BTreeMap<String, Value>;

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| Error::invalid_json(e.to_string()))
}

impl Store {
    /// Serializes every table and value as `[tables, values]`.
    pub fn get_json(&self) -> Result<String> {
        serde_json::to_string(&(self.get_tables(), self.get_values()))
            .map_err(|e| Error::invalid_json(e.to_string()))
    }

    /// Serializes every table.
    pub fn get_tables_json(&self) -> Result<String> {
        serde_json::to_string(&self.get_tables()).map_err(|e| Error::invalid_json(e.to_string()))
    }

    /// Serializes every value, defaults included.
    pub fn get_values_json(&self) -> Result<String> {
        serde_json::to_string(&self.get_values()).map_err(|e| Error::invalid_json(e.to_string()))
    }

    /// Replaces every table and value from a `[tables, values]` document.
    ///
    /// Both halves are validated before either is applied, and listeners
    /// fire once for the whole import.
    pub fn set_json(&self, json: &str) -> Result<()> {
        let (tables, values): (Tables, Values) = parse(json)?;
        self.transaction(|store| {
            store.set_tables(tables)?;
            store.set_values(values)
        })
    }

    /// Replaces every table from a JSON object.
    pub fn set_tables_json(&self, json: &str) -> Result<()> {
        let tables: Tables = parse(json)?;
        self.set_tables(tables)
    }

    /// Replaces every stored value from a JSON object.
    pub fn set_values_json(&self, json: &str) -> Result<()> {
        let values: Values = parse(json)?;
        self.set_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tabulon_core::schema::{TableSchemaBuilder, TablesSchema, ValuesSchemaBuilder};
    use tabulon_core::{CellType, Row};

    fn create_store() -> Store {
        let users = TableSchemaBuilder::new("users")
            .unwrap()
            .add_column("name", CellType::String)
            .unwrap()
            .add_column_with_default("age", CellType::Number, 0)
            .unwrap()
            .build()
            .unwrap();
        let store = Store::new();
        store
            .set_tables_schema(TablesSchema::new().with_table(users).unwrap())
            .unwrap();
        store
            .set_values_schema(
                ValuesSchemaBuilder::new()
                    .add_value_with_default("appVersion", CellType::String, "1.0.0")
                    .unwrap()
                    .add_value("currentUserId", CellType::String)
                    .unwrap()
                    .build(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_get_json_shape() {
        let store = create_store();
        store
            .set_row("users", "u1", Row::new().with("name", "Alice"))
            .unwrap();
        assert_eq!(
            store.get_json().unwrap(),
            r#"[{"users":{"u1":{"age":0.0,"name":"Alice"}}},{"appVersion":"1.0.0"}]"#
        );
    }

    #[test]
    fn test_json_round_trip() {
        let source = create_store();
        source
            .set_row("users", "u1", Row::new().with("name", "Alice").with("age", 30))
            .unwrap();
        source.set_value("currentUserId", "u1").unwrap();

        let target = create_store();
        target.set_json(&source.get_json().unwrap()).unwrap();
        assert_eq!(target.get_tables(), source.get_tables());
        assert_eq!(target.get_values(), source.get_values());
    }

    #[test]
    fn test_set_json_fires_once_per_table() {
        let store = create_store();
        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        store
            .add_table_listener("users", move |_| fired_clone.set(fired_clone.get() + 1))
            .unwrap();

        store
            .set_json(r#"[{"users":{"a":{"name":"A"},"b":{"name":"B"}}},{}]"#)
            .unwrap();
        assert_eq!(fired.get(), 1);
        assert_eq!(store.row_count("users").unwrap(), 2);
    }

    #[test]
    fn test_set_json_rejects_malformed() {
        let store = create_store();
        assert!(matches!(
            store.set_json("[{"),
            Err(Error::InvalidJson { .. })
        ));
        assert!(matches!(
            store.set_tables_json(r#"{"users":{"a":{"name":null}}}"#),
            Err(Error::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_set_json_is_atomic() {
        let store = create_store();
        store
            .set_row("users", "u1", Row::new().with("name", "Alice"))
            .unwrap();

        // The values half fails its type check, so the tables half is undone
        let result = store.set_json(r#"[{"users":{}},{"appVersion":2}]"#);
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
        assert!(store.has_row("users", "u1").unwrap());
    }

    #[test]
    fn test_halves_round_trip() {
        let source = create_store();
        source
            .set_row("users", "u1", Row::new().with("name", "Alice"))
            .unwrap();
        assert_eq!(source.get_values_json().unwrap(), r#"{"appVersion":"1.0.0"}"#);

        let target = create_store();
        target.set_tables_json(&source.get_tables_json().unwrap()).unwrap();
        target.set_values_json(&source.get_values_json().unwrap()).unwrap();
        assert_eq!(target.get_json().unwrap(), source.get_json().unwrap());
    }

    #[test]
    fn test_set_values_json() {
        let store = create_store();
        store.set_values_json(r#"{"currentUserId":"u9"}"#).unwrap();
        assert_eq!(
            store.get_value("currentUserId").unwrap(),
            Some(Value::from("u9"))
        );
        assert!(store.set_values_json(r#"{"unknown":1}"#).is_err());
    }
}
