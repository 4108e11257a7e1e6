//! Identifier and validated scalar types for the identity domain.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of an internal user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a store-assigned user identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the wrapped numeric value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identifier of a user profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i64);

impl ProfileId {
    /// Wraps a store-assigned profile identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the wrapped numeric value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric identifier the chat platform assigns to a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalChatId(i64);

impl ExternalChatId {
    /// Wraps a chat-platform participant identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the wrapped numeric value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExternalChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique login handle of an internal user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserHandle(String);

impl UserHandle {
    /// Maximum handle length accepted by the `users.handle` column.
    pub const MAX_LENGTH: usize = 150;

    const CHAT_PREFIX: &'static str = "telegram_";

    /// Creates a validated handle.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyHandle`] when the trimmed value is
    /// empty or [`IdentityDomainError::HandleTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityDomainError::EmptyHandle);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(IdentityDomainError::HandleTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Derives the handle used for accounts created from chat contact.
    ///
    /// The mapping is injective, so repeated contact from one participant
    /// always resolves to the same handle and distinct participants never
    /// collide.
    #[must_use]
    pub fn for_external_chat(external_id: ExternalChatId) -> Self {
        Self(format!("{}{external_id}", Self::CHAT_PREFIX))
    }

    /// Returns the handle as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserHandle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque address of the conversation where outbound messages are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHandle(String);

impl ConversationHandle {
    /// Maximum length accepted by the `user_profiles.conversation_handle` column.
    pub const MAX_LENGTH: usize = 50;

    /// Creates a validated conversation handle.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyConversationHandle`] for blank
    /// input or [`IdentityDomainError::ConversationHandleTooLong`] when the
    /// value exceeds [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityDomainError::EmptyConversationHandle);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(IdentityDomainError::ConversationHandleTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a handle from a numeric chat identifier.
    #[must_use]
    pub fn from_chat_id(chat_id: i64) -> Self {
        Self(chat_id.to_string())
    }

    /// Returns the handle as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ConversationHandle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ConversationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
