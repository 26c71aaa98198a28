//! Column filters.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::FilterParseError;
use crate::model::Value;

/// Comparison applied by a [`ColumnFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Case-insensitive equality of the display text.
    Equals,
    /// Case-insensitive substring match.
    Contains,
    /// Case-insensitive prefix match.
    StartsWith,
    /// Case-insensitive suffix match.
    EndsWith,
    /// Numeric `>`; non-numeric operands fail the filter.
    GreaterThan,
    /// Numeric `<`; non-numeric operands fail the filter.
    LessThan,
}

impl FilterOp {
    /// Short symbol used in filter chips.
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::Equals => "=",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "starts with",
            FilterOp::EndsWith => "ends with",
            FilterOp::GreaterThan => ">",
            FilterOp::LessThan => "<",
        }
    }
}

impl FromStr for FilterOp {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" | "equals" => Ok(FilterOp::Equals),
            "contains" | "like" => Ok(FilterOp::Contains),
            "startswith" | "starts_with" | "starts-with" => Ok(FilterOp::StartsWith),
            "endswith" | "ends_with" | "ends-with" => Ok(FilterOp::EndsWith),
            "gt" | ">" | "greater_than" => Ok(FilterOp::GreaterThan),
            "lt" | "<" | "less_than" => Ok(FilterOp::LessThan),
            other => Err(FilterParseError::UnknownOperator(other.to_string())),
        }
    }
}

/// A filter condition on one column.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{ColumnFilter, FilterOp};
/// use datagrid_lib::model::Value;
///
/// let filter = ColumnFilter::gt("score", 50);
/// assert!(filter.matches(&Value::from(75i64)));
/// assert!(!filter.matches(&Value::from("n/a")));
///
/// let parsed: ColumnFilter = "status:eq:active".parse().unwrap();
/// assert_eq!(parsed.op, FilterOp::Equals);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Id of the column the filter applies to.
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl ColumnFilter {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates an equality filter.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Equals, value)
    }

    /// Creates a contains filter.
    pub fn contains(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Contains, value)
    }

    /// Creates a starts-with filter.
    pub fn starts_with(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::StartsWith, value)
    }

    /// Creates an ends-with filter.
    pub fn ends_with(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::EndsWith, value)
    }

    /// Creates a greater-than filter.
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::GreaterThan, value)
    }

    /// Creates a less-than filter.
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::LessThan, value)
    }

    /// Tests a cell value against this filter. Never fails: values that
    /// cannot be compared do not match.
    pub fn matches(&self, cell: &Value) -> bool {
        match self.op {
            FilterOp::GreaterThan => numeric(cell, &self.value).is_some_and(|(a, b)| a > b),
            FilterOp::LessThan => numeric(cell, &self.value).is_some_and(|(a, b)| a < b),
            op => {
                let haystack = cell.to_string().to_lowercase();
                let needle = self.value.to_string().to_lowercase();
                if needle.is_empty() {
                    return true;
                }
                match op {
                    FilterOp::Equals => haystack == needle,
                    FilterOp::Contains => haystack.contains(&needle),
                    FilterOp::StartsWith => haystack.starts_with(&needle),
                    FilterOp::EndsWith => haystack.ends_with(&needle),
                    FilterOp::GreaterThan | FilterOp::LessThan => false,
                }
            }
        }
    }
}

fn numeric(a: &Value, b: &Value) -> Option<(f64, f64)> {
    Some((a.as_f64()?, b.as_f64()?))
}

impl fmt::Display for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op.symbol(), self.value)
    }
}

impl FromStr for ColumnFilter {
    type Err = FilterParseError;

    /// Parses `field:op:value`. The value may itself contain `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(column), Some(op), Some(value)) if !column.trim().is_empty() => Ok(Self::new(
                column.trim(),
                op.parse::<FilterOp>()?,
                value,
            )),
            _ => Err(FilterParseError::Malformed(s.to_string())),
        }
    }
}

/// The active column filters, combined with logical AND.
///
/// At most one filter per column is kept: adding a filter for a column that
/// already has one replaces it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<ColumnFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter, replacing any existing filter on the same column.
    /// Returns the replaced filter.
    pub fn add(&mut self, filter: ColumnFilter) -> Option<ColumnFilter> {
        match self.filters.iter_mut().find(|f| f.column == filter.column) {
            Some(existing) => Some(std::mem::replace(existing, filter)),
            None => {
                self.filters.push(filter);
                None
            }
        }
    }

    /// Removes the filter on `column`, if any.
    pub fn remove(&mut self, column: &str) -> Option<ColumnFilter> {
        let index = self.filters.iter().position(|f| f.column == column)?;
        Some(self.filters.remove(index))
    }

    /// Removes all filters.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Returns the filter on `column`, if any.
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.iter().find(|f| f.column == column)
    }

    /// Iterates over the filters in the order they were first added.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a ColumnFilter;
    type IntoIter = std::slice::Iter<'a, ColumnFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_operators() {
        let name = Value::from("Grace Hopper");
        assert!(ColumnFilter::eq("name", "grace hopper").matches(&name));
        assert!(ColumnFilter::contains("name", "HOP").matches(&name));
        assert!(ColumnFilter::starts_with("name", "gra").matches(&name));
        assert!(ColumnFilter::ends_with("name", "per").matches(&name));
        assert!(!ColumnFilter::eq("name", "grace").matches(&name));
    }

    #[test]
    fn test_empty_value_matches_for_string_operators() {
        assert!(ColumnFilter::eq("name", "").matches(&Value::from("Ada")));
        assert!(ColumnFilter::contains("name", "").matches(&Value::Null));
        assert!(!ColumnFilter::lt("score", "").matches(&Value::from(1i64)));
    }

    #[test]
    fn test_numeric_operators_coerce() {
        assert!(ColumnFilter::gt("score", "10").matches(&Value::from(11i64)));
        assert!(ColumnFilter::gt("score", 10).matches(&Value::from("10.5")));
        assert!(!ColumnFilter::gt("score", 10).matches(&Value::from(10i64)));
        assert!(ColumnFilter::lt("score", 10).matches(&Value::from(-3.0)));
    }

    #[test]
    fn test_non_numeric_fails_without_panicking() {
        assert!(!ColumnFilter::gt("score", 10).matches(&Value::from("ten")));
        assert!(!ColumnFilter::lt("score", "ten").matches(&Value::from(3i64)));
        assert!(!ColumnFilter::lt("score", 10).matches(&Value::Null));
        assert!(!ColumnFilter::gt("score", "").matches(&Value::from(3i64)));
    }

    #[test]
    fn test_dates_compare_numerically() {
        let filter = ColumnFilter::gt("joined", "2024-01-01");
        assert!(filter.matches(&Value::from("2024-06-01")));
        assert!(!filter.matches(&Value::from("2023-12-31")));
    }

    #[test]
    fn test_parse_filter() {
        let filter: ColumnFilter = "url:contains:https://x".parse().unwrap();
        assert_eq!(filter.column, "url");
        assert_eq!(filter.op, FilterOp::Contains);
        assert_eq!(filter.value, Value::from("https://x"));

        assert_eq!(
            "score:between:3".parse::<ColumnFilter>(),
            Err(FilterParseError::UnknownOperator("between".into()))
        );
        assert!(matches!(
            "score".parse::<ColumnFilter>(),
            Err(FilterParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_filter_set_replaces_same_column() {
        let mut set = FilterSet::new();
        set.add(ColumnFilter::eq("status", "active"));
        set.add(ColumnFilter::gt("score", 5));
        let replaced = set.add(ColumnFilter::eq("status", "inactive"));

        assert_eq!(replaced, Some(ColumnFilter::eq("status", "active")));
        assert_eq!(set.len(), 2);
        let columns: Vec<_> = set.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, ["status", "score"]);
        assert_eq!(set.get("status").unwrap().value, Value::from("inactive"));
    }

    #[test]
    fn test_filter_set_remove() {
        let mut set = FilterSet::new();
        set.add(ColumnFilter::eq("status", "active"));
        set.add(ColumnFilter::gt("score", 5));

        assert!(set.remove("status").is_some());
        assert!(set.remove("status").is_none());
        assert_eq!(set.len(), 1);
        assert!(set.get("score").is_some());
    }
}
