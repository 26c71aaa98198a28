//! Bulk actions over the selected rows.
//!
//! A bulk action moves through a small state machine owned by the grid:
//!
//! ```text
//! Idle ──request──▶ ConfirmPending ──confirm──▶ Running ──finish──▶ Done
//!   │                    │                         ▲                 │
//!   │                 cancel ─▶ Idle               │              request
//!   └───────────request (no confirmation)──────────┘                 ▼
//! ```
//!
//! The operation itself runs outside the grid as a [`BulkJob`], so the view
//! stays usable while it is pending.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BulkError;

/// An asynchronous operation applied to a set of rows.
///
/// Implement this directly, or wrap an async closure with
/// [`BulkAction::from_fn`].
#[async_trait]
pub trait BulkOperation<R>: Send + Sync {
    async fn run(&self, records: &[R]) -> Result<(), BulkError>;
}

struct FnOperation<F> {
    f: F,
}

#[async_trait]
impl<R, F, Fut> BulkOperation<R> for FnOperation<F>
where
    R: Clone + Send + Sync + 'static,
    F: Fn(Vec<R>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BulkError>> + Send + 'static,
{
    async fn run(&self, records: &[R]) -> Result<(), BulkError> {
        (self.f)(records.to_vec()).await
    }
}

/// Confirmation prompt shown before a bulk action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    /// Message text; `{count}` is replaced by the number of selected rows.
    pub message: String,
    pub confirm_label: String,
}

impl Confirmation {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
        }
    }

    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    /// Message with `{count}` filled in.
    pub fn message_for(&self, count: usize) -> String {
        self.message.replace("{count}", &count.to_string())
    }
}

/// A named operation over the current selection.
///
/// # Example
///
/// ```
/// use datagrid_lib::{BulkAction, Confirmation};
/// use datagrid_lib::model::Record;
///
/// let archive = BulkAction::from_fn("archive", "Archive", |rows: Vec<Record>| async move {
///     assert!(!rows.is_empty());
///     Ok(())
/// })
/// .danger()
/// .confirm(Confirmation::new("Archive rows", "Archive {count} rows?"));
///
/// assert!(archive.confirmation.is_some());
/// ```
pub struct BulkAction<R> {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    /// Destructive action; UIs usually style it as a warning.
    pub danger: bool,
    pub confirmation: Option<Confirmation>,
    operation: Arc<dyn BulkOperation<R>>,
}

impl<R: Send + Sync> BulkAction<R> {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        operation: impl BulkOperation<R> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            danger: false,
            confirmation: None,
            operation: Arc::new(operation),
        }
    }

    /// Creates an action from an async closure receiving the selected rows.
    pub fn from_fn<F, Fut>(id: impl Into<String>, label: impl Into<String>, f: F) -> Self
    where
        R: Clone + 'static,
        F: Fn(Vec<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BulkError>> + Send + 'static,
    {
        Self::new(id, label, FnOperation { f })
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    /// Require confirmation before running.
    pub fn confirm(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = Some(confirmation);
        self
    }

    pub(crate) fn job(&self, records: Vec<R>) -> BulkJob<R> {
        BulkJob {
            action: self.id.clone(),
            operation: Arc::clone(&self.operation),
            records,
        }
    }
}

impl<R> fmt::Debug for BulkAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("danger", &self.danger)
            .field("confirmation", &self.confirmation)
            .finish_non_exhaustive()
    }
}

/// A bulk action bound to the rows it will run on.
///
/// The rows are resolved when the job is created; later selection changes
/// do not affect it.
pub struct BulkJob<R> {
    action: String,
    operation: Arc<dyn BulkOperation<R>>,
    records: Vec<R>,
}

impl<R: Send + Sync> BulkJob<R> {
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Runs the operation. There is no cancellation: the future runs to
    /// completion or failure.
    pub async fn execute(&self) -> Result<(), BulkError> {
        self.operation.run(&self.records).await
    }
}

impl<R> fmt::Debug for BulkJob<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkJob")
            .field("action", &self.action)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

/// Where the grid is in the bulk action flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BulkState {
    #[default]
    Idle,
    /// Waiting for the user to confirm or cancel.
    ConfirmPending { action: String },
    /// The job is executing.
    Running { action: String },
    /// The last job finished; `outcome` holds its result until acknowledged.
    Done {
        action: String,
        outcome: Result<(), BulkError>,
    },
}

impl BulkState {
    /// Returns `true` while a job is executing.
    pub fn is_running(&self) -> bool {
        matches!(self, BulkState::Running { .. })
    }

    /// Returns `true` if a new action may be requested.
    pub fn is_ready(&self) -> bool {
        matches!(self, BulkState::Idle | BulkState::Done { .. })
    }

    /// Id of the action this state refers to, if any.
    pub fn action(&self) -> Option<&str> {
        match self {
            BulkState::Idle => None,
            BulkState::ConfirmPending { action }
            | BulkState::Running { action }
            | BulkState::Done { action, .. } => Some(action),
        }
    }
}

/// Result of requesting a bulk action.
#[derive(Debug)]
pub enum BulkRequest<R> {
    /// The action needs confirmation first.
    Confirm(Confirmation),
    /// The action is running; execute the job and report back with
    /// [`DataGrid::finish_bulk_action`](crate::DataGrid::finish_bulk_action).
    Ready(BulkJob<R>),
}

/// Result of [`DataGrid::run_bulk_action`](crate::DataGrid::run_bulk_action).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// The action ran successfully and the selection was cleared.
    Completed { affected: usize },
    /// The action is waiting for confirmation.
    AwaitingConfirmation(Confirmation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_message() {
        let confirmation = Confirmation::new("Delete", "Delete {count} students?")
            .with_confirm_label("Delete");
        assert_eq!(confirmation.message_for(3), "Delete 3 students?");
        assert_eq!(confirmation.confirm_label, "Delete");
    }

    #[test]
    fn test_state_helpers() {
        assert!(BulkState::Idle.is_ready());
        assert!(
            BulkState::Done {
                action: "a".into(),
                outcome: Ok(())
            }
            .is_ready()
        );
        let running = BulkState::Running { action: "a".into() };
        assert!(running.is_running());
        assert!(!running.is_ready());
        assert_eq!(running.action(), Some("a"));
        assert_eq!(BulkState::Idle.action(), None);
    }

    #[tokio::test]
    async fn test_from_fn_receives_records() {
        let action: BulkAction<i32> = BulkAction::from_fn("sum", "Sum", |rows: Vec<i32>| async move {
            if rows.iter().sum::<i32>() == 6 {
                Ok(())
            } else {
                Err(BulkError::new("wrong rows"))
            }
        });

        let job = action.job(vec![1, 2, 3]);
        assert_eq!(job.action(), "sum");
        assert!(job.execute().await.is_ok());
        assert!(action.job(vec![1]).execute().await.is_err());
    }
}
