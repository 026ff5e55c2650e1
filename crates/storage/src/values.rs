//! Storage for standalone named values.

use std::collections::{BTreeMap, BTreeSet};

use tabulon_core::schema::ValuesSchema;
use tabulon_core::{Error, Result, Value};

/// Outcome of a value write that changed storage.
///
/// `old` and `new` are the value as read, defaults included, so they can be
/// equal when only the stored value changed.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueWrite {
    pub name: String,
    /// Stored value before the write; restored on rollback.
    pub stored: Option<Value>,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

/// Typed storage for the store's top-level values.
#[derive(Clone, Debug, Default)]
pub struct ValueStore {
    schema: ValuesSchema,
    values: BTreeMap<String, Value>,
}

impl ValueStore {
    /// Creates an empty value store for the given schema.
    pub fn new(schema: ValuesSchema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    /// Gets a value, falling back to the schema default.
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        if !self.schema.contains(name) {
            return Err(Error::value_not_found(name));
        }
        Ok(self.read(name))
    }

    /// Reads a known value without the name check.
    fn read(&self, name: &str) -> Option<Value> {
        self.values
            .get(name)
            .or_else(|| self.schema.default_for(name))
            .cloned()
    }

    /// Sets a value. Returns `None` if the same value was already stored.
    pub fn set(&mut self, name: &str, value: Value) -> Result<Option<ValueWrite>> {
        self.schema.check(name, &value)?;
        if self.values.get(name) == Some(&value) {
            return Ok(None);
        }
        let old = self.read(name);
        let stored = self.values.insert(name.to_string(), value.clone());
        Ok(Some(ValueWrite {
            name: name.to_string(),
            stored,
            old,
            new: Some(value),
        }))
    }

    /// Unsets a value. Returns `None` if nothing was stored.
    pub fn delete(&mut self, name: &str) -> Result<Option<ValueWrite>> {
        if !self.schema.contains(name) {
            return Err(Error::value_not_found(name));
        }
        let old = self.read(name);
        Ok(self.values.remove(name).map(|stored| ValueWrite {
            name: name.to_string(),
            stored: Some(stored),
            old,
            new: self.read(name),
        }))
    }

    /// Returns every value that reads as set: stored values plus defaults.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        let mut all: BTreeMap<String, Value> = self
            .schema
            .defaults()
            .map(|(name, v)| (name.to_string(), v.clone()))
            .collect();
        all.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        all
    }

    /// Validates a full replacement of the stored values.
    pub fn conform_all(&self, values: &BTreeMap<String, Value>) -> Result<()> {
        for (name, value) in values {
            self.schema.check(name, value)?;
        }
        Ok(())
    }

    /// Replaces every stored value with already-validated values.
    ///
    /// Returns one write per name whose stored value changed.
    pub fn replace_all(&mut self, values: BTreeMap<String, Value>) -> Vec<ValueWrite> {
        let previous = core::mem::replace(&mut self.values, values);
        let names: BTreeSet<&String> = previous.keys().chain(self.values.keys()).collect();
        names
            .into_iter()
            .filter(|name| previous.get(*name) != self.values.get(*name))
            .map(|name| ValueWrite {
                name: name.clone(),
                stored: previous.get(name).cloned(),
                old: previous
                    .get(name)
                    .or_else(|| self.schema.default_for(name))
                    .cloned(),
                new: self.read(name),
            })
            .collect()
    }

    /// Restores a stored value without validation. Used for rollback.
    pub(crate) fn restore(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(v) => {
                self.values.insert(name.to_string(), v);
            }
            None => {
                self.values.remove(name);
            }
        }
    }
}
