//! One-to-one chat-platform extension of a [`super::User`].

use super::{ConversationHandle, ExternalChatId, ProfileId, UserId};

/// Data required to insert a new profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    user_id: UserId,
    external_id: Option<ExternalChatId>,
    conversation: Option<ConversationHandle>,
}

impl NewUserProfile {
    /// Creates an insert request for the given user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            external_id: None,
            conversation: None,
        }
    }

    /// Sets the chat-platform participant id recorded on creation.
    #[must_use]
    pub const fn with_external_id(mut self, external_id: ExternalChatId) -> Self {
        self.external_id = Some(external_id);
        self
    }

    /// Sets the initial conversation handle.
    #[must_use]
    pub fn with_conversation(mut self, conversation: ConversationHandle) -> Self {
        self.conversation = Some(conversation);
        self
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the participant id, if any.
    #[must_use]
    pub const fn external_id(&self) -> Option<ExternalChatId> {
        self.external_id
    }

    /// Returns the initial conversation handle, if any.
    #[must_use]
    pub const fn conversation(&self) -> Option<&ConversationHandle> {
        self.conversation.as_ref()
    }
}

/// Persisted profile fields used to reconstruct a [`UserProfile`].
#[derive(Debug, Clone)]
pub struct PersistedProfileData {
    /// Store-assigned identifier.
    pub id: ProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Chat-platform participant id.
    pub external_id: Option<ExternalChatId>,
    /// Last conversation the participant wrote from.
    pub conversation: Option<ConversationHandle>,
}

/// Chat identity and delivery address attached to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id: ProfileId,
    user_id: UserId,
    external_id: Option<ExternalChatId>,
    conversation: Option<ConversationHandle>,
}

impl UserProfile {
    /// Reconstructs a profile from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProfileData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            external_id: data.external_id,
            conversation: data.conversation,
        }
    }

    /// Returns the profile identifier.
    #[must_use]
    pub const fn id(&self) -> ProfileId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the chat-platform participant id.
    #[must_use]
    pub const fn external_id(&self) -> Option<ExternalChatId> {
        self.external_id
    }

    /// Returns the conversation where notifications are delivered.
    #[must_use]
    pub const fn conversation(&self) -> Option<&ConversationHandle> {
        self.conversation.as_ref()
    }

    /// Records the conversation of the latest chat contact.
    pub fn set_conversation(&mut self, conversation: ConversationHandle) {
        self.conversation = Some(conversation);
    }
}
