//! Value conversion between Rust types and `cozo::DataValue`.
//!
//! The `DatabaseValue` trait covers extraction; the free functions build
//! values for inserts and filters.

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use cozo::{DataValue, Num};

/// Column values for a write, keyed by column name.
pub type Values = BTreeMap<String, DataValue>;

/// Trait for database values that can be extracted to Rust types.
pub trait DatabaseValue: Clone + Debug {
    /// Extract as String if the value is a string.
    fn as_string(&self) -> Option<String>;

    /// Extract as i64 if the value is an integer.
    fn as_i64(&self) -> Option<i64>;

    /// Extract as bool if the value is boolean.
    fn as_bool(&self) -> Option<bool>;

    fn is_null(&self) -> bool;

    /// Get type name for error messages.
    fn type_name(&self) -> &'static str;

    /// Interpret an integer as microseconds since the Unix epoch.
    fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        self.as_i64().and_then(DateTime::from_timestamp_micros)
    }
}

impl DatabaseValue for DataValue {
    fn as_string(&self) -> Option<String> {
        match self {
            DataValue::Str(s) => Some(s.to_string()),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Num(Num::Int(i)) => Some(*i),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "bool",
            DataValue::Num(Num::Int(_)) => "int",
            DataValue::Num(Num::Float(_)) => "float",
            DataValue::Str(_) => "string",
            DataValue::Bytes(_) => "bytes",
            DataValue::List(_) => "list",
            DataValue::Set(_) => "set",
            DataValue::Vec(_) => "vec",
            DataValue::Json(_) => "json",
            DataValue::Uuid(_) => "uuid",
            DataValue::Regex(_) => "regex",
            DataValue::Bot => "bot",
            DataValue::Validity(_) => "validity",
        }
    }
}

pub fn int(value: i64) -> DataValue {
    DataValue::Num(Num::Int(value))
}

pub fn text(value: impl AsRef<str>) -> DataValue {
    DataValue::Str(value.as_ref().into())
}

pub fn boolean(value: bool) -> DataValue {
    DataValue::Bool(value)
}

pub fn timestamp(value: DateTime<Utc>) -> DataValue {
    int(value.timestamp_micros())
}

pub fn null() -> DataValue {
    DataValue::Null
}

pub fn opt_text(value: Option<impl AsRef<str>>) -> DataValue {
    value.map(text).unwrap_or(DataValue::Null)
}

pub fn opt_int(value: Option<i64>) -> DataValue {
    value.map(int).unwrap_or(DataValue::Null)
}

pub fn opt_timestamp(value: Option<DateTime<Utc>>) -> DataValue {
    value.map(timestamp).unwrap_or(DataValue::Null)
}

/// Render a value for error messages.
pub fn display_value(value: &DataValue) -> String {
    match value {
        DataValue::Str(s) => s.to_string(),
        DataValue::Num(Num::Int(i)) => i.to_string(),
        DataValue::Num(Num::Float(f)) => f.to_string(),
        DataValue::Bool(b) => b.to_string(),
        DataValue::Null => "NULL".to_string(),
        other => format!("{:?}", other),
    }
}
