//! Clause values and their native attribute encoding

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value in the store's native attribute representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String attribute
    #[serde(rename = "S")]
    S(String),
    /// Number attribute, carried as its decimal text
    #[serde(rename = "N")]
    N(String),
    /// Native boolean (only produced by custom converters)
    #[serde(rename = "BOOL")]
    Bool(bool),
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::S(value.into())
    }

    pub fn number(value: impl fmt::Display) -> Self {
        AttributeValue::N(value.to_string())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(s) => write!(f, "{{S: {:?}}}", s),
            AttributeValue::N(n) => write!(f, "{{N: {}}}", n),
            AttributeValue::Bool(b) => write!(f, "{{BOOL: {}}}", b),
        }
    }
}

/// Value supplied with a clause, before encoding
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    List(Vec<ClauseValue>),
    Null,
}

impl ClauseValue {
    /// Returns the value kind for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ClauseValue::String(_) => "string",
            ClauseValue::Integer(_) => "integer",
            ClauseValue::Float(_) => "float",
            ClauseValue::Boolean(_) => "boolean",
            ClauseValue::Timestamp(_) => "timestamp",
            ClauseValue::Uuid(_) => "uuid",
            ClauseValue::List(_) => "list",
            ClauseValue::Null => "null",
        }
    }
}

impl From<&str> for ClauseValue {
    fn from(value: &str) -> Self {
        ClauseValue::String(value.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(value: String) -> Self {
        ClauseValue::String(value)
    }
}

impl From<i64> for ClauseValue {
    fn from(value: i64) -> Self {
        ClauseValue::Integer(value)
    }
}

impl From<i32> for ClauseValue {
    fn from(value: i32) -> Self {
        ClauseValue::Integer(i64::from(value))
    }
}

impl From<u32> for ClauseValue {
    fn from(value: u32) -> Self {
        ClauseValue::Integer(i64::from(value))
    }
}

impl From<f64> for ClauseValue {
    fn from(value: f64) -> Self {
        ClauseValue::Float(value)
    }
}

impl From<bool> for ClauseValue {
    fn from(value: bool) -> Self {
        ClauseValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for ClauseValue {
    fn from(value: DateTime<Utc>) -> Self {
        ClauseValue::Timestamp(value)
    }
}

impl From<Uuid> for ClauseValue {
    fn from(value: Uuid) -> Self {
        ClauseValue::Uuid(value)
    }
}

impl<T: Into<ClauseValue>> From<Vec<T>> for ClauseValue {
    fn from(values: Vec<T>) -> Self {
        ClauseValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClauseValue>> From<Option<T>> for ClauseValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ClauseValue::Null, Into::into)
    }
}
