//! Typed field access errors

/// Error returned by the typed getters on [`Record`](crate::model::Record).
///
/// A present field holding null is not an error; getters return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("no field '{field}'")]
    Missing { field: String },

    #[error("field '{field}' holds {actual}, not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A string field could not be read as the requested type.
    #[error("field '{field}' value '{value}' is not a valid {expected}")]
    Unparsable {
        field: String,
        expected: &'static str,
        value: String,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    pub fn unparsable(field: impl Into<String>, expected: &'static str, value: &str) -> Self {
        Self::Unparsable {
            field: field.into(),
            expected,
            value: value.to_string(),
        }
    }
}
