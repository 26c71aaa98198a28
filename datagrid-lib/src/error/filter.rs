//! Errors raised while parsing filter expressions

/// Error returned when a textual filter cannot be parsed.
///
/// Only parsing fails: evaluating a filter never errors, an unusable filter
/// simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    /// The operator name is not recognised.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// The expression is not of the form `field:op:value`.
    #[error("malformed filter '{0}', expected field:op:value")]
    Malformed(String),
}
