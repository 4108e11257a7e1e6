//! Task operations shared by the HTTP and chat surfaces.

use crate::identity::domain::UserId;
use crate::task::{
    domain::{
        NewTask, ParseTaskStatusError, Task, TaskChanges, TaskDomainError, TaskId, TaskPriority,
        TaskQuery, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
///
/// The owner is never part of the request; it is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with status `new` and priority `medium`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            deadline: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets an optional deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Outcome of looking up a task on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskLookup {
    /// The task exists and the caller owns it.
    Found(Task),
    /// The task does not exist, or belongs to someone else.
    NotFoundOrForbidden,
}

/// Service-level errors for task commands.
#[derive(Debug, Error)]
pub enum TaskCommandError {
    /// The requested status is not a known value.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist or the caller does not own it.
    #[error("task not found or not owned by the caller")]
    NotFoundOrForbidden,
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task command operations.
pub type TaskCommandResult<T> = Result<T, TaskCommandError>;

/// Task command layer.
///
/// Every operation except [`Self::list`] takes the acting user, and a task
/// owned by anyone else is reported exactly like a missing one.
#[derive(Clone)]
pub struct TaskService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskService<R>
where
    R: TaskRepository,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists every task of `owner`, latest deadline first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::Repository`] when the store fails.
    pub async fn list_for_owner(&self, owner: UserId) -> TaskCommandResult<Vec<Task>> {
        self.list(&TaskQuery::natural_order(owner)).await
    }

    /// Lists the tasks selected by `query`. The query is always scoped to
    /// its requester.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::Repository`] when the store fails.
    pub async fn list(&self, query: &TaskQuery) -> TaskCommandResult<Vec<Task>> {
        Ok(self.repository.list_tasks(query).await?)
    }

    /// Creates a task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::Domain`] when the title is invalid, or
    /// [`TaskCommandError::Repository`] when the store fails.
    pub async fn create(
        &self,
        owner: UserId,
        request: CreateTaskRequest,
    ) -> TaskCommandResult<Task> {
        let CreateTaskRequest {
            title,
            description,
            status,
            priority,
            deadline,
        } = request;
        let mut new_task = NewTask::new(owner, TaskTitle::new(title)?)
            .with_description(description)
            .with_status(status)
            .with_priority(priority);
        if let Some(due) = deadline {
            new_task = new_task.with_deadline(due);
        }

        let task = self.repository.store_task(&new_task).await?;
        info!(task_id = %task.id(), %owner, "created task");
        Ok(task)
    }

    /// Looks up a task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::Repository`] when the store fails.
    pub async fn find_owned(&self, owner: UserId, id: TaskId) -> TaskCommandResult<TaskLookup> {
        let lookup = match self.repository.find_task(id).await? {
            Some(task) if task.is_owned_by(owner) => TaskLookup::Found(task),
            Some(_) | None => TaskLookup::NotFoundOrForbidden,
        };
        Ok(lookup)
    }

    /// Sets the status of a task owned by `owner`.
    ///
    /// The status is validated before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::InvalidStatus`] for an unknown status,
    /// [`TaskCommandError::NotFoundOrForbidden`] when the task is missing or
    /// foreign, or [`TaskCommandError::Repository`] when the store fails.
    pub async fn update_status(
        &self,
        owner: UserId,
        id: TaskId,
        raw_status: &str,
    ) -> TaskCommandResult<Task> {
        let status = TaskStatus::try_from(raw_status)?;
        let mut task = self.require_owned(owner, id).await?;
        task.set_status(status);
        self.persist(&task).await?;
        info!(task_id = %id, status = %status, "updated task status");
        Ok(task)
    }

    /// Applies field changes to a task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::NotFoundOrForbidden`] when the task is
    /// missing or foreign, or [`TaskCommandError::Repository`] when the store
    /// fails.
    pub async fn update(
        &self,
        owner: UserId,
        id: TaskId,
        changes: TaskChanges,
    ) -> TaskCommandResult<Task> {
        let mut task = self.require_owned(owner, id).await?;
        task.apply(changes);
        self.persist(&task).await?;
        debug!(task_id = %id, "updated task fields");
        Ok(task)
    }

    /// Deletes a task owned by `owner` and returns its last state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::NotFoundOrForbidden`] when the task is
    /// missing or foreign, or [`TaskCommandError::Repository`] when the store
    /// fails.
    pub async fn delete(&self, owner: UserId, id: TaskId) -> TaskCommandResult<Task> {
        let task = self.require_owned(owner, id).await?;
        match self.repository.delete_task(id).await {
            Ok(()) => {
                info!(task_id = %id, "deleted task");
                Ok(task)
            }
            Err(TaskRepositoryError::TaskNotFound(_)) => Err(TaskCommandError::NotFoundOrForbidden),
            Err(err) => Err(err.into()),
        }
    }

    async fn require_owned(&self, owner: UserId, id: TaskId) -> TaskCommandResult<Task> {
        match self.find_owned(owner, id).await? {
            TaskLookup::Found(task) => Ok(task),
            TaskLookup::NotFoundOrForbidden => Err(TaskCommandError::NotFoundOrForbidden),
        }
    }

    async fn persist(&self, task: &Task) -> TaskCommandResult<()> {
        match self.repository.update_task(task).await {
            Ok(()) => Ok(()),
            Err(TaskRepositoryError::TaskNotFound(_)) => Err(TaskCommandError::NotFoundOrForbidden),
            Err(err) => Err(err.into()),
        }
    }
}
