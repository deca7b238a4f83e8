use tasklists_core::{Board, ListId, Priority, TaskId};
use tasklists_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid collection: {0}")]
    Invalid(#[from] tasklists_core::TasklistsError),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// The operations a front end may invoke on the task board.
///
/// Every mutation is total: unknown ids and blank text are no-ops that
/// return `false`/`None`. Implementations decide how changes are persisted.
pub trait BoardService {
    /// Current state; re-project when `board().revision()` changes.
    fn board(&self) -> &Board;

    // -- Lists --
    fn add_list(&mut self, name: &str) -> Option<ListId>;
    fn remove_list(&mut self, list_id: ListId) -> bool;
    fn rename_list(&mut self, list_id: ListId, name: &str) -> bool;

    // -- Tasks --
    fn add_task(&mut self, list_id: ListId, title: &str, priority: Priority) -> Option<TaskId>;
    fn toggle_task(&mut self, list_id: ListId, task_id: TaskId) -> bool;
    fn remove_task(&mut self, list_id: ListId, task_id: TaskId) -> bool;
    fn clear_done(&mut self, list_id: ListId) -> bool;
    fn set_priority(&mut self, list_id: ListId, task_id: TaskId, priority: Priority) -> bool;

    /// True when a change has not reached storage yet.
    fn is_dirty(&self) -> bool;

    /// Write the full state out if a change has not been saved yet.
    fn flush(&mut self) -> Result<(), ServiceError>;
}
