//! Named result rows and the `Entity` mapping trait.

use chrono::{DateTime, Utc};
use cozo::{DataValue, NamedRows};

use super::value::{DatabaseValue, Values};
use super::DbError;

/// One result row with its column headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    headers: Vec<String>,
    values: Vec<DataValue>,
}

impl Record {
    pub fn new(headers: Vec<String>, values: Vec<DataValue>) -> Self {
        Self { headers, values }
    }

    /// Split a query result into records.
    pub fn from_rows(rows: NamedRows) -> Vec<Record> {
        let headers = rows.headers;
        rows.rows
            .into_iter()
            .map(|values| Record::new(headers.clone(), values))
            .collect()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn get(&self, name: &str) -> Result<&DataValue, DbError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| DbError::MissingColumn {
                name: name.to_string(),
            })
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: &'static str,
        extract: impl Fn(&DataValue) -> Option<T>,
    ) -> Result<Option<T>, DbError> {
        let value = self.get(name)?;
        if value.is_null() {
            return Ok(None);
        }
        extract(value).map(Some).ok_or_else(|| DbError::TypeMismatch {
            column: name.to_string(),
            expected,
            found: value.type_name(),
        })
    }

    fn required<T>(&self, name: &str, value: Option<T>, expected: &'static str) -> Result<T, DbError> {
        value.ok_or_else(|| DbError::TypeMismatch {
            column: name.to_string(),
            expected,
            found: "null",
        })
    }

    pub fn opt_string(&self, name: &str) -> Result<Option<String>, DbError> {
        self.typed(name, "string", DatabaseValue::as_string)
    }

    pub fn string(&self, name: &str) -> Result<String, DbError> {
        let value = self.opt_string(name)?;
        self.required(name, value, "string")
    }

    pub fn opt_int(&self, name: &str) -> Result<Option<i64>, DbError> {
        self.typed(name, "int", DatabaseValue::as_i64)
    }

    pub fn int(&self, name: &str) -> Result<i64, DbError> {
        let value = self.opt_int(name)?;
        self.required(name, value, "int")
    }

    pub fn boolean(&self, name: &str) -> Result<bool, DbError> {
        let value = self.typed(name, "bool", DatabaseValue::as_bool)?;
        self.required(name, value, "bool")
    }

    pub fn opt_timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, DbError> {
        self.typed(name, "timestamp", DatabaseValue::as_timestamp)
    }

    pub fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, DbError> {
        let value = self.opt_timestamp(name)?;
        self.required(name, value, "timestamp")
    }

    /// All columns as a write map.
    pub fn to_values(&self) -> Values {
        self.headers
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

/// A typed row of one table.
pub trait Entity: Sized {
    /// Physical table name.
    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn from_record(record: &Record) -> Result<Self, DbError>;
}
