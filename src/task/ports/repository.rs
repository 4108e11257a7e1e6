//! Repository ports for tasks and comments.

use crate::task::domain::{Comment, CommentId, NewComment, NewTask, Task, TaskId, TaskQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task and returns the stored record.
    async fn store_task(&self, task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Persists the mutable fields of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn update_task(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task together with its comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn delete_task(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier, regardless of owner.
    async fn find_task(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists the tasks selected by `query`, in query order.
    async fn list_tasks(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;
}

/// Comment persistence contract.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Inserts a new comment and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the parent task
    /// does not exist.
    async fn store_comment(&self, comment: &NewComment) -> TaskRepositoryResult<Comment>;

    /// Finds a comment by identifier.
    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>>;

    /// Lists the comments of a task, newest first.
    ///
    /// An unknown task yields an empty list.
    async fn list_comments(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Comment>>;

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::CommentNotFound`] when the comment does
    /// not exist.
    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The comment was not found.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
