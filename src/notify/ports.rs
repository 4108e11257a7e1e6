//! Outbound messaging ports.

use crate::identity::domain::{ConversationHandle, User};
use crate::task::domain::{Comment, Task};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while delivering a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or timed out.
    #[error("message transport request failed: {0}")]
    Request(String),

    /// The platform answered but refused the message.
    #[error("message rejected by the platform: {0}")]
    Rejected(String),

    /// The platform response could not be decoded.
    #[error("malformed platform response: {0}")]
    Decode(String),
}

/// Sends plain text to a conversation.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Delivers `text` to `conversation`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the message was not accepted.
    async fn send_text(
        &self,
        conversation: &ConversationHandle,
        text: &str,
    ) -> Result<(), TransportError>;
}

/// Reacts to newly stored comments.
///
/// Implementations must not fail: the comment is already stored when this
/// runs, and its creation is reported as successful whatever happens here.
#[async_trait]
pub trait CommentNotifier: Send + Sync {
    /// Called once after `comment` by `author` was stored on `task`.
    async fn comment_created(&self, task: &Task, author: &User, comment: &Comment);
}
