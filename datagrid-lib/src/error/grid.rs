//! Grid operation errors

use super::BulkError;
use super::ExportError;

/// Error type for [`DataGrid`](crate::DataGrid) operations.
///
/// View transformations never fail; only bulk actions and export do.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// No bulk action is registered under this id.
    #[error("unknown bulk action '{0}'")]
    UnknownAction(String),

    /// A bulk action was requested with an empty selection.
    #[error("no rows selected")]
    NothingSelected,

    /// A bulk action is already running.
    #[error("bulk action '{0}' is still running")]
    Busy(String),

    /// `confirm` or `cancel` was called with no confirmation pending.
    #[error("no bulk action is awaiting confirmation")]
    NoPendingConfirmation,

    /// A result was reported while no bulk action was running.
    #[error("no bulk action is running")]
    NotRunning,

    /// The bulk action itself failed. The selection is preserved.
    #[error("bulk action '{action}' failed: {source}")]
    ActionFailed {
        action: String,
        #[source]
        source: BulkError,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}
