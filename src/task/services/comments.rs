//! Comment creation, listing, and removal.

use crate::identity::domain::{User, UserId};
use crate::notify::CommentNotifier;
use crate::task::{
    domain::{Comment, CommentId, CommentText, NewComment, TaskDomainError, TaskId},
    ports::{CommentRepository, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for comment commands.
#[derive(Debug, Error)]
pub enum CommentCommandError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task or comment does not exist, or the caller may not touch it.
    #[error("comment or task not found")]
    NotFoundOrForbidden,
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for comment command operations.
pub type CommentCommandResult<T> = Result<T, CommentCommandError>;

/// Comment orchestration service.
///
/// Any user may comment on any existing task. Author and parent task are
/// always supplied by the caller context, and the task owner is notified
/// after every successful insert.
#[derive(Clone)]
pub struct CommentService<R, N, C>
where
    R: TaskRepository + CommentRepository,
    N: CommentNotifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> CommentService<R, N, C>
where
    R: TaskRepository + CommentRepository,
    N: CommentNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new comment service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Stores a comment by `author` on `task_id` and notifies the task owner.
    ///
    /// The notification outcome never affects the result.
    ///
    /// # Errors
    ///
    /// Returns [`CommentCommandError::Domain`] for blank text,
    /// [`CommentCommandError::NotFoundOrForbidden`] when the task does not
    /// exist, or [`CommentCommandError::Repository`] when the store fails.
    pub async fn create(
        &self,
        author: &User,
        task_id: TaskId,
        text: &str,
    ) -> CommentCommandResult<Comment> {
        let body = CommentText::new(text)?;
        let task = self
            .repository
            .find_task(task_id)
            .await?
            .ok_or(CommentCommandError::NotFoundOrForbidden)?;

        let request = NewComment::new(task_id, author.id(), body, self.clock.as_ref());
        let comment = match self.repository.store_comment(&request).await {
            Ok(stored) => stored,
            Err(TaskRepositoryError::TaskNotFound(_)) => {
                return Err(CommentCommandError::NotFoundOrForbidden);
            }
            Err(err) => return Err(err.into()),
        };
        info!(%task_id, comment_id = %comment.id(), author = %author.handle(), "stored comment");

        self.notifier.comment_created(&task, author, &comment).await;
        Ok(comment)
    }

    /// Lists the comments of a task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CommentCommandError::Repository`] when the store fails.
    pub async fn list(&self, task_id: TaskId) -> CommentCommandResult<Vec<Comment>> {
        Ok(self.repository.list_comments(task_id).await?)
    }

    /// Deletes a comment written by `requester` on `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CommentCommandError::NotFoundOrForbidden`] when the comment
    /// does not exist, sits on another task, or has another author.
    pub async fn delete(
        &self,
        requester: UserId,
        task_id: TaskId,
        comment_id: CommentId,
    ) -> CommentCommandResult<()> {
        let comment = self
            .repository
            .find_comment(comment_id)
            .await?
            .filter(|found| found.task_id() == task_id && found.author() == requester)
            .ok_or(CommentCommandError::NotFoundOrForbidden)?;

        match self.repository.delete_comment(comment.id()).await {
            Ok(()) => {
                info!(%task_id, %comment_id, "deleted comment");
                Ok(())
            }
            Err(TaskRepositoryError::CommentNotFound(_)) => {
                Err(CommentCommandError::NotFoundOrForbidden)
            }
            Err(err) => Err(err.into()),
        }
    }
}
