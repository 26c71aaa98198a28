//! Dynamic record

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use super::Value;
use crate::error::FieldError;
use crate::row::GridRow;

/// A dynamic record: one row of untyped data.
///
/// Records hold field values in an ordered map so that their serialized
/// form, and therefore their structural key, is deterministic. Typed
/// getter methods provide safe access with proper error handling.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Record;
///
/// let record = Record::new()
///     .with_key("u-1")
///     .set("name", "Ada")
///     .set("score", 42i64);
///
/// assert_eq!(record.get_string("name").unwrap(), Some("Ada"));
/// assert_eq!(record.key(), Some("u-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Caller-supplied unique key.
    pub(crate) key: Option<String>,

    /// The field values.
    pub(crate) fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record key (builder pattern).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    // =========================================================================
    // Key accessors
    // =========================================================================

    /// Returns the caller-supplied key, if set.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Sets the record key.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    /// Uses the stringified value of `field` as the record key.
    ///
    /// Missing or null fields leave the key unset.
    pub fn key_from_field(&mut self, field: &str) {
        match self.fields.get(field) {
            Some(Value::Null) | None => {}
            Some(value) => self.key = Some(value.to_string()),
        }
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Gets an integer field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets an f64 field value.
    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Float(n)) => Ok(Some(*n)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)), // Allow widening
            Some(other) => Err(FieldError::type_mismatch(field, "float", other.type_name())),
        }
    }

    /// Gets a DateTime field value.
    ///
    /// RFC 3339 strings are parsed on access.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(*dt)),
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
                Err(_) => Err(FieldError::unparsable(field, "datetime", s)),
            },
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "datetime",
                other.type_name(),
            )),
        }
    }

    /// Gets a date field value.
    ///
    /// `YYYY-MM-DD` strings are parsed on access.
    pub fn get_date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Date(d)) => Ok(Some(*d)),
            Some(Value::String(s)) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(d) => Ok(Some(d)),
                Err(_) => Err(FieldError::unparsable(field, "date", s)),
            },
            Some(other) => Err(FieldError::type_mismatch(field, "date", other.type_name())),
        }
    }

    /// Gets a nested Record field value.
    pub fn get_record(&self, field: &str) -> Result<Option<&Record>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Record(r)) => Ok(Some(r.as_ref())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "record",
                other.type_name(),
            )),
        }
    }
}

impl GridRow for Record {
    fn key(&self) -> Option<String> {
        self.key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::new()
            .set("name", "Ada")
            .set("age", 36i64)
            .set("active", true)
            .set("manager", Value::Null);

        assert_eq!(record.get_string("name").unwrap(), Some("Ada"));
        assert_eq!(record.get_int("age").unwrap(), Some(36));
        assert_eq!(record.get_float("age").unwrap(), Some(36.0));
        assert_eq!(record.get_bool("active").unwrap(), Some(true));
        assert_eq!(record.get_string("manager").unwrap(), None);
    }

    #[test]
    fn test_getter_errors() {
        let record = Record::new().set("age", 36i64);

        assert!(matches!(
            record.get_string("missing"),
            Err(FieldError::Missing { .. })
        ));
        assert!(matches!(
            record.get_string("age"),
            Err(FieldError::TypeMismatch { expected: "string", actual: "int", .. })
        ));
    }

    #[test]
    fn test_date_getters_parse_strings() {
        let record = Record::new()
            .set("joined", "2023-06-01")
            .set("seen", "2024-01-02T03:04:05Z");

        assert_eq!(
            record.get_date("joined").unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 1)
        );
        assert!(record.get_datetime("seen").unwrap().is_some());
        assert!(matches!(
            record.get_date("seen"),
            Err(FieldError::Unparsable { expected: "date", .. })
        ));
    }

    #[test]
    fn test_key_from_field() {
        let mut record = Record::new().set("id", 7i64);
        record.key_from_field("id");
        assert_eq!(record.key(), Some("7"));

        let mut unkeyed = Record::new().set("id", Value::Null);
        unkeyed.key_from_field("id");
        assert_eq!(unkeyed.key(), None);
    }
}
