//! Wire types of the Bot API.

use crate::chat::{InboundMessage, InboundUpdate};
use crate::identity::domain::{ConversationHandle, ExternalChatId};
use serde::{Deserialize, Serialize};

/// Envelope of every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// `true` when the call succeeded.
    pub ok: bool,
    /// Payload of a successful call.
    pub result: Option<T>,
    /// Human-readable failure reason.
    pub description: Option<String>,
    /// Numeric failure code.
    pub error_code: Option<i64>,
}

/// One entry of the `getUpdates` feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update id.
    pub update_id: i64,
    /// New incoming message, if this update is one.
    pub message: Option<Message>,
}

/// An incoming message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Author; absent for channel posts.
    pub from: Option<Sender>,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Text body, absent for media messages.
    pub text: Option<String>,
}

/// Author of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    /// Participant id.
    pub id: i64,
}

/// A conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat id.
    pub id: i64,
}

/// Body of `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Body of `getUpdates`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: [&'static str; 1],
}

impl From<Update> for InboundUpdate {
    fn from(update: Update) -> Self {
        let message = update.message.and_then(|message| {
            let sender = message.from?;
            let text = message.text?;
            Some(InboundMessage {
                sender: ExternalChatId::new(sender.id),
                conversation: ConversationHandle::from_chat_id(message.chat.id),
                text,
            })
        });
        Self {
            update_id: update.update_id,
            message,
        }
    }
}
