//! Task store port (System A).

use super::RemoteResult;
use crate::mirror::domain::{TaskDraft, TaskId, TaskPatch, TaskRecord};
use async_trait::async_trait;

/// Read/write contract for the task store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists every task, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when any page cannot be fetched or
    /// decoded.
    async fn list_tasks(&self) -> RemoteResult<Vec<TaskRecord>>;

    /// Creates a task and returns the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError`] when the store rejects the create.
    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<TaskRecord>;

    /// Applies a partial update to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`super::RemoteError::NotFound`] for unknown tasks or another
    /// variant when the store rejects the update.
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> RemoteResult<()>;
}
