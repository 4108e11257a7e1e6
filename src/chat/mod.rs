//! Chat-bot front door to the task command layer.
//!
//! Messages arrive through an [`UpdateSource`], are tokenized into a
//! [`CommandInvocation`], and routed by an explicit [`CommandRouter`] to one
//! of the command handlers. Replies go back through the same
//! [`crate::notify::MessageTransport`] used for notifications.

mod command;
mod error;
mod handlers;
mod poller;
mod ports;
pub mod replies;
mod router;

pub use command::{CommandInvocation, CommandParseError};
pub use error::ChatError;
pub use handlers::{
    CommandContext, CommandHandler, DeleteTaskHandler, ListTasksHandler, NewTaskHandler,
    StartHandler, UpdateTaskHandler,
};
pub use poller::{ChatBot, DEFAULT_RETRY_DELAY};
pub use ports::{InboundMessage, InboundUpdate, UpdateSource};
pub use router::CommandRouter;

#[cfg(test)]
mod tests;
