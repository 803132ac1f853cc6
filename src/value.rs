// Attribute values - the closed set of shapes a record field can hold

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Layout used whenever an internal date value is written to storage
pub const STORAGE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// ATTRIBUTE VALUE
// ============================================================================

/// A single field value on a record.
///
/// `Integer` and `Float` are kept apart because both SQLite and JSON
/// distinguish them, and boolean storage values are the integers 0/1.
/// `Date` is the internal date value produced when a presentation string is
/// parsed on its way to storage; it serializes in `STORAGE_DATETIME_FORMAT`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum AttributeValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDateTime),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Borrow the text of a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            AttributeValue::Date(dt) => Some(dt),
            _ => None,
        }
    }

    /// Short type label used in log lines
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Float(_) => "float",
            AttributeValue::String(_) => "string",
            AttributeValue::Date(_) => "date",
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for AttributeValue {
    fn from(value: NaiveDateTime) -> Self {
        AttributeValue::Date(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttributeValue::Null,
            serde_json::Value::Bool(b) => AttributeValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Integer(i),
                None => n
                    .as_f64()
                    .map(AttributeValue::Float)
                    .unwrap_or(AttributeValue::Null),
            },
            serde_json::Value::String(s) => AttributeValue::String(s),
            // Records are flat; nested documents are kept as their JSON text
            nested => AttributeValue::String(nested.to_string()),
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Null => serde_json::Value::Null,
            AttributeValue::Boolean(b) => serde_json::Value::Bool(b),
            AttributeValue::Integer(i) => serde_json::Value::from(i),
            AttributeValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttributeValue::String(s) => serde_json::Value::String(s),
            AttributeValue::Date(dt) => {
                serde_json::Value::String(dt.format(STORAGE_DATETIME_FORMAT).to_string())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
