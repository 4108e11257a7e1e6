//! Inbound port of the chat surface.

use crate::identity::domain::{ConversationHandle, ExternalChatId};
use crate::notify::TransportError;
use async_trait::async_trait;

/// A text message received from a chat participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Platform id of the participant who wrote the message.
    pub sender: ExternalChatId,
    /// Conversation the message was written in; replies go here.
    pub conversation: ConversationHandle,
    /// Raw message text.
    pub text: String,
}

/// One entry of the platform's update feed.
///
/// Updates that carry no text message still advance the feed offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    /// Monotonic update identifier assigned by the platform.
    pub update_id: i64,
    /// The text message, when the update carries one.
    pub message: Option<InboundMessage>,
}

/// Source of inbound chat updates.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Waits for updates with an id of at least `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the feed cannot be read.
    async fn next_updates(&self, offset: Option<i64>) -> Result<Vec<InboundUpdate>, TransportError>;
}
