//! Value enum for dynamic field values

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use uuid::Uuid;

use super::Record;

/// A dynamic value that can hold any cell type.
///
/// Rows expose their cells to the grid as `Value`s through column
/// accessors, so filtering, sorting, searching and export all work on this
/// one type regardless of the row's concrete shape.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Value;
///
/// let name = Value::from("Ada");
/// let score = Value::from(42i64);
/// let active = Value::from(true);
/// let empty = Value::Null;
/// assert_eq!(score.as_f64(), Some(42.0));
/// assert!(empty.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// GUID/UUID value.
    Guid(Uuid),
    /// Date and time with timezone.
    DateTime(DateTime<Utc>),
    /// Calendar date without a time component.
    Date(NaiveDate),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested record.
    Record(Box<Record>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Guid(_) => "guid",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerces this value to a number.
    ///
    /// Numbers convert directly, strings are parsed after trimming (first as
    /// a number, then as a date), and temporal values become milliseconds
    /// since the Unix epoch. Everything else, including NaN, yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            Value::Decimal(d) => d.to_f64()?,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) => n,
                    Err(_) => return parse_temporal(trimmed)?.as_f64(),
                }
            }
            Value::DateTime(dt) => dt.timestamp_millis() as f64,
            Value::Date(d) => d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis() as f64,
            _ => return None,
        };
        if n.is_nan() { None } else { Some(n) }
    }

    /// Converts a string holding an RFC 3339 timestamp or a `YYYY-MM-DD`
    /// date into the matching temporal variant. Other values are returned
    /// unchanged.
    pub fn into_temporal(self) -> Value {
        match self {
            Value::String(s) => parse_temporal(s.trim()).unwrap_or(Value::String(s)),
            other => other,
        }
    }

    /// Formats this value for display, using `date_format` for temporal
    /// values.
    pub fn format_with(&self, date_format: &str) -> String {
        match self {
            Value::DateTime(dt) => dt.format(date_format).to_string(),
            Value::Date(d) => d.format(date_format).to_string(),
            other => other.to_string(),
        }
    }

    /// Total ordering used for sorting.
    ///
    /// Values are first grouped by kind: booleans, then numbers, then
    /// temporal values, then text (strings, GUIDs, lists and records by
    /// their display form), with null after everything. Within a group
    /// numbers compare numerically across variants, temporal values
    /// chronologically, text case-insensitively with byte order breaking
    /// ties, and booleans with `false < true`. Remaining ties are broken by
    /// variant and then by exact value, so the order stays consistent for
    /// any mix of variants.
    pub fn compare(&self, other: &Value) -> Ordering {
        self.group()
            .cmp(&other.group())
            .then_with(|| match (self, other) {
                (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
                (a, b) if a.group() == Group::Number => {
                    a.number_key().total_cmp(&b.number_key())
                }
                (a, b) if a.group() == Group::Temporal => a.temporal_key().cmp(&b.temporal_key()),
                (a, b) if a.group() == Group::Text => compare_text(&a.to_string(), &b.to_string()),
                _ => Ordering::Equal,
            })
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
            .then_with(|| match (self, other) {
                (Value::Int(a), Value::Int(b)) => a.cmp(b),
                (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
                (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
                (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
                _ => Ordering::Equal,
            })
    }

    fn group(&self) -> Group {
        match self {
            Value::Bool(_) => Group::Bool,
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => Group::Number,
            Value::DateTime(_) | Value::Date(_) => Group::Temporal,
            Value::String(_) | Value::Guid(_) | Value::List(_) | Value::Record(_) => Group::Text,
            Value::Null => Group::Null,
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Decimal(_) => 4,
            Value::String(_) => 5,
            Value::Guid(_) => 6,
            Value::DateTime(_) => 7,
            Value::Date(_) => 8,
            Value::List(_) => 9,
            Value::Record(_) => 10,
        }
    }

    // NaN sorts after every number under `total_cmp`.
    fn number_key(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            Value::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    fn temporal_key(&self) -> i64 {
        match self {
            Value::DateTime(dt) => dt.timestamp_millis(),
            Value::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map_or(i64::MIN, |dt| dt.and_utc().timestamp_millis()),
            _ => i64::MIN,
        }
    }
}

/// Sort groups, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Bool,
    Number,
    Temporal,
    Text,
    Null,
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date.
pub(crate) fn parse_temporal(s: &str) -> Option<Value> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Value::DateTime(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => f.write_str(s),
            Value::Guid(g) => write!(f, "{}", g),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Record(record) => match serde_json::to_string(record) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

// =============================================================================
// JSON conversion
// =============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut record = Record::new();
                for (field, value) in map {
                    record.insert(field, Value::from(value));
                }
                Value::Record(Box::new(record))
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
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

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(Box::new(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
