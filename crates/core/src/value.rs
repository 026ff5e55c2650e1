//! Value type definitions for Tabulon.
//!
//! This module defines the `Value` enum which represents the content of a
//! table cell or of a standalone named value.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::CellType;

/// A scalar stored in a cell or as a standalone value.
///
/// Serialized untagged, so JSON `"a"`, `1.5` and `true` map directly onto
/// the three variants.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// UTF-8 string
    String(String),
    /// 64-bit floating point number
    Number(f64),
    /// Boolean value
    Boolean(bool),
}

impl Value {
    /// Returns the cell type of this value.
    pub fn cell_type(&self) -> CellType {
        match self {
            Value::String(_) => CellType::String,
            Value::Number(_) => CellType::Number,
            Value::Boolean(_) => CellType::Boolean,
        }
    }

    /// Returns false for NaN and infinite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Number(n) => n.is_finite(),
            _ => true,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_check() {
        assert_eq!(Value::Number(42.0).cell_type(), CellType::Number);
        assert_eq!(Value::from("x").cell_type(), CellType::String);
        assert_eq!(Value::from(true).cell_type(), CellType::Boolean);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Number(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::Number(1.0).as_str(), None);
        assert_eq!(Value::String("true".into()).as_bool(), None);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::from(42), Value::Number(42.0));
        assert_ne!(Value::from("1"), Value::from(1));
        assert_ne!(Value::from(false), Value::from(0));
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_value_finite() {
        assert!(Value::Number(1.0).is_finite());
        assert!(!Value::Number(f64::NAN).is_finite());
        assert!(!Value::Number(f64::INFINITY).is_finite());
        assert!(Value::from("inf").is_finite());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(Value::from(28).to_string(), "28");
        assert_eq!(Value::from(true).to_string(), "true");
    }
}
