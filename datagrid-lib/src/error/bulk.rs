//! Bulk action failure

use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

/// Error returned by a bulk operation.
///
/// Cloneable so the grid can keep the last failure in its bulk state for
/// the UI to display. Two errors are equal when their messages are.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct BulkError {
    /// Human-readable failure message.
    pub message: String,
    /// The error that caused the failure, if any.
    #[source]
    pub source: Option<Arc<dyn Error + Send + Sync>>,
}

impl BulkError {
    /// Creates a new bulk error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error, keeping it as the source.
    pub fn from_err<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: err.to_string(),
            source: Some(Arc::new(err)),
        }
    }

    /// Creates an error with its own message and an underlying cause.
    pub fn with_source<E>(message: impl Display, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: message.to_string(),
            source: Some(Arc::new(source)),
        }
    }
}

impl PartialEq for BulkError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl Eq for BulkError {}
