//! Explicit command-name to handler table.

use std::collections::HashMap;
use std::sync::Arc;

use super::handlers::{
    CommandContext, CommandHandler, DeleteTaskHandler, ListTasksHandler, NewTaskHandler,
    StartHandler, UpdateTaskHandler,
};
use super::{CommandInvocation, InboundMessage, replies};
use crate::app::{Backend, Services};
use tracing::{debug, error};

/// Routes parsed commands to their handlers.
///
/// The table is built once at startup and never changes afterwards.
#[derive(Clone, Default)]
pub struct CommandRouter {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the router for `/start`, `/tasks`, `/newtask`, `/deletetask`
    /// and `/updatetask`.
    #[must_use]
    pub fn standard<B: Backend>(services: &Arc<Services<B>>) -> Self {
        Self::new()
            .with_handler("start", Arc::new(StartHandler::new(Arc::clone(services))))
            .with_handler("tasks", Arc::new(ListTasksHandler::new(Arc::clone(services))))
            .with_handler("newtask", Arc::new(NewTaskHandler::new(Arc::clone(services))))
            .with_handler(
                "deletetask",
                Arc::new(DeleteTaskHandler::new(Arc::clone(services))),
            )
            .with_handler(
                "updatetask",
                Arc::new(UpdateTaskHandler::new(Arc::clone(services))),
            )
    }

    /// Registers `handler` under `command` (without the leading slash).
    #[must_use]
    pub fn with_handler(mut self, command: &str, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(command.to_ascii_lowercase(), handler);
        self
    }

    /// Returns the registered command names, sorted.
    #[must_use]
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Handles one inbound message and returns the reply, if any.
    ///
    /// Plain text and unknown commands get no reply. Handler failures are
    /// logged and answered with a generic failure text.
    pub async fn dispatch(&self, message: &InboundMessage) -> Option<String> {
        let invocation = match CommandInvocation::parse(&message.text) {
            Ok(invocation) => invocation,
            Err(err) => {
                debug!(sender = %message.sender, error = %err, "ignoring non-command message");
                return None;
            }
        };
        let Some(handler) = self.handlers.get(invocation.command()) else {
            debug!(
                sender = %message.sender,
                command = invocation.command(),
                "ignoring unknown command"
            );
            return None;
        };

        let command = invocation.command().to_owned();
        let context = CommandContext {
            sender: message.sender,
            conversation: message.conversation.clone(),
            invocation,
        };
        match handler.handle(&context).await {
            Ok(reply) => Some(reply),
            Err(err) => {
                error!(sender = %message.sender, %command, error = %err, "chat command failed");
                Some(replies::GENERIC_FAILURE.to_owned())
            }
        }
    }
}
