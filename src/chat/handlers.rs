//! The five chat commands.

use std::sync::Arc;

use super::{ChatError, CommandInvocation, replies};
use crate::app::{Backend, Services};
use crate::identity::domain::{ConversationHandle, ExternalChatId, User};
use crate::identity::services::Registration;
use crate::task::domain::{TaskDomainError, TaskId, TaskStatus};
use crate::task::services::{CreateTaskRequest, TaskCommandError};
use async_trait::async_trait;

/// Everything a handler knows about one command message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Platform id of the participant.
    pub sender: ExternalChatId,
    /// Conversation the command came from.
    pub conversation: ConversationHandle,
    /// Parsed command and arguments.
    pub invocation: CommandInvocation,
}

/// Executes one chat command and produces the reply text.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handles the command.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] for store failures. Expected outcomes such as
    /// bad arguments or missing tasks are replies, not errors.
    async fn handle(&self, context: &CommandContext) -> Result<String, ChatError>;
}

async fn registered_user<B: Backend>(
    services: &Services<B>,
    sender: ExternalChatId,
) -> Result<Option<User>, ChatError> {
    match services.identity.lookup_registered(sender).await? {
        Registration::Registered(user) => Ok(Some(user)),
        Registration::NotRegistered => Ok(None),
    }
}

/// `/start`: registers the participant and remembers the conversation.
pub struct StartHandler<B: Backend> {
    services: Arc<Services<B>>,
}

impl<B: Backend> StartHandler<B> {
    /// Creates the handler.
    #[must_use]
    pub const fn new(services: Arc<Services<B>>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl<B: Backend> CommandHandler for StartHandler<B> {
    async fn handle(&self, context: &CommandContext) -> Result<String, ChatError> {
        let user = self
            .services
            .identity
            .reconcile(context.sender, context.conversation.clone())
            .await?;
        Ok(replies::registered(&user))
    }
}

/// `/tasks`: lists the caller's tasks, latest deadline first.
pub struct ListTasksHandler<B: Backend> {
    services: Arc<Services<B>>,
}

impl<B: Backend> ListTasksHandler<B> {
    /// Creates the handler.
    #[must_use]
    pub const fn new(services: Arc<Services<B>>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl<B: Backend> CommandHandler for ListTasksHandler<B> {
    async fn handle(&self, context: &CommandContext) -> Result<String, ChatError> {
        let Some(user) = registered_user(&self.services, context.sender).await? else {
            return Ok(replies::NOT_REGISTERED.to_owned());
        };
        let tasks = self.services.tasks.list_for_owner(user.id()).await?;
        Ok(replies::task_list(&tasks))
    }
}

/// `/newtask <title...>`: creates a task with status `new` and priority
/// `medium`.
pub struct NewTaskHandler<B: Backend> {
    services: Arc<Services<B>>,
}

impl<B: Backend> NewTaskHandler<B> {
    /// Creates the handler.
    #[must_use]
    pub const fn new(services: Arc<Services<B>>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl<B: Backend> CommandHandler for NewTaskHandler<B> {
    async fn handle(&self, context: &CommandContext) -> Result<String, ChatError> {
        let Some(user) = registered_user(&self.services, context.sender).await? else {
            return Ok(replies::NOT_REGISTERED.to_owned());
        };
        let title = context.invocation.joined_arguments();
        if title.is_empty() {
            return Ok(replies::NEW_TASK_USAGE.to_owned());
        }

        match self
            .services
            .tasks
            .create(user.id(), CreateTaskRequest::new(title))
            .await
        {
            Ok(task) => Ok(replies::task_created(&task)),
            Err(TaskCommandError::Domain(TaskDomainError::EmptyTitle)) => {
                Ok(replies::NEW_TASK_USAGE.to_owned())
            }
            Err(TaskCommandError::Domain(err)) => Ok(format!("❌ Invalid task title: {err}.")),
            Err(err) => Err(err.into()),
        }
    }
}

/// `/deletetask <task_id>`: deletes one of the caller's tasks.
pub struct DeleteTaskHandler<B: Backend> {
    services: Arc<Services<B>>,
}

impl<B: Backend> DeleteTaskHandler<B> {
    /// Creates the handler.
    #[must_use]
    pub const fn new(services: Arc<Services<B>>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl<B: Backend> CommandHandler for DeleteTaskHandler<B> {
    async fn handle(&self, context: &CommandContext) -> Result<String, ChatError> {
        let Some(user) = registered_user(&self.services, context.sender).await? else {
            return Ok(replies::NOT_REGISTERED.to_owned());
        };
        let Some(raw_id) = context.invocation.argument(0) else {
            return Ok(replies::DELETE_TASK_USAGE.to_owned());
        };
        let Ok(task_id) = raw_id.parse::<TaskId>() else {
            return Ok(replies::TASK_NOT_FOUND.to_owned());
        };

        match self.services.tasks.delete(user.id(), task_id).await {
            Ok(task) => Ok(replies::task_deleted(&task)),
            Err(TaskCommandError::NotFoundOrForbidden) => Ok(replies::TASK_NOT_FOUND.to_owned()),
            Err(err) => Err(err.into()),
        }
    }
}

/// `/updatetask <task_id> <status>`: changes the status of one of the
/// caller's tasks.
pub struct UpdateTaskHandler<B: Backend> {
    services: Arc<Services<B>>,
}

impl<B: Backend> UpdateTaskHandler<B> {
    /// Creates the handler.
    #[must_use]
    pub const fn new(services: Arc<Services<B>>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl<B: Backend> CommandHandler for UpdateTaskHandler<B> {
    async fn handle(&self, context: &CommandContext) -> Result<String, ChatError> {
        let Some(user) = registered_user(&self.services, context.sender).await? else {
            return Ok(replies::NOT_REGISTERED.to_owned());
        };
        let (Some(raw_id), Some(raw_status)) = (
            context.invocation.argument(0),
            context.invocation.argument(1),
        ) else {
            return Ok(replies::UPDATE_TASK_USAGE.to_owned());
        };
        if TaskStatus::try_from(raw_status).is_err() {
            return Ok(replies::invalid_status());
        }
        let Ok(task_id) = raw_id.parse::<TaskId>() else {
            return Ok(replies::TASK_NOT_FOUND.to_owned());
        };

        match self
            .services
            .tasks
            .update_status(user.id(), task_id, raw_status)
            .await
        {
            Ok(task) => Ok(replies::status_updated(&task)),
            Err(TaskCommandError::InvalidStatus(_)) => Ok(replies::invalid_status()),
            Err(TaskCommandError::NotFoundOrForbidden) => Ok(replies::TASK_NOT_FOUND.to_owned()),
            Err(err) => Err(err.into()),
        }
    }
}
