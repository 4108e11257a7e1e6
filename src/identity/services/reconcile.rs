//! Reconciliation of chat-platform participants with internal users.

use crate::identity::{
    domain::{
        ConversationHandle, ExternalChatId, IdentityDomainError, NewUser, NewUserProfile, User,
        UserHandle, UserId, UserProfile,
    },
    ports::{IdentityRepositoryError, ProfileRepository, UserRepository},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Outcome of looking up a chat participant without registering them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The participant has a profile linked to this user.
    Registered(User),
    /// The participant never ran `/start` (or the linked user is gone).
    NotRegistered,
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
}

/// Result type for identity service operations.
pub type IdentityServiceResult<T> = Result<T, IdentityServiceError>;

/// Links chat participants to internal users.
///
/// No locks are taken. Concurrent first contact from one participant is
/// resolved by the store's unique constraints: the losing writer sees a
/// duplicate error, re-reads the winner's row, and carries on.
#[derive(Clone)]
pub struct IdentityService<R>
where
    R: UserRepository + ProfileRepository,
{
    repository: Arc<R>,
}

impl<R> IdentityService<R>
where
    R: UserRepository + ProfileRepository,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolves (creating if needed) the user behind a chat participant and
    /// records the conversation they last wrote from.
    ///
    /// Calling this repeatedly with the same participant id yields the same
    /// user and at most one profile.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Repository`] when the store fails for
    /// any reason other than a recoverable duplicate insert.
    pub async fn reconcile(
        &self,
        external_id: ExternalChatId,
        conversation: ConversationHandle,
    ) -> IdentityServiceResult<User> {
        if let Some(mut profile) = self
            .repository
            .find_profile_by_external_id(external_id)
            .await?
            && let Some(user) = self.repository.find_user(profile.user_id()).await?
        {
            profile.set_conversation(conversation);
            self.repository.update_profile(&profile).await?;
            debug!(user = %user.handle(), "refreshed conversation for known participant");
            return Ok(user);
        }

        let handle = UserHandle::for_external_chat(external_id);
        let user = self.find_or_create_user(handle).await?;
        let mut profile = self.find_or_create_profile(user.id(), external_id).await?;
        profile.set_conversation(conversation);
        self.repository.update_profile(&profile).await?;
        Ok(user)
    }

    /// Returns the registered user for a participant without creating
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Repository`] when a lookup fails.
    pub async fn lookup_registered(
        &self,
        external_id: ExternalChatId,
    ) -> IdentityServiceResult<Registration> {
        let Some(profile) = self
            .repository
            .find_profile_by_external_id(external_id)
            .await?
        else {
            return Ok(Registration::NotRegistered);
        };
        let registration = self
            .repository
            .find_user(profile.user_id())
            .await?
            .map_or(Registration::NotRegistered, Registration::Registered);
        Ok(registration)
    }

    async fn find_or_create_user(&self, handle: UserHandle) -> IdentityServiceResult<User> {
        if let Some(user) = self.repository.find_user_by_handle(&handle).await? {
            return Ok(user);
        }

        match self.repository.create_user(&NewUser::new(handle.clone())).await {
            Ok(user) => {
                info!(user = %user.handle(), "registered user from chat contact");
                Ok(user)
            }
            Err(err) if err.is_duplicate() => {
                debug!(user = %handle, "user created concurrently, re-reading");
                let user = self.repository.find_user_by_handle(&handle).await?;
                user.ok_or_else(|| err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_or_create_profile(
        &self,
        user_id: UserId,
        external_id: ExternalChatId,
    ) -> IdentityServiceResult<UserProfile> {
        if let Some(profile) = self.repository.find_profile_for_user(user_id).await? {
            return Ok(profile);
        }

        let request = NewUserProfile::new(user_id).with_external_id(external_id);
        match self.repository.create_profile(&request).await {
            Ok(profile) => Ok(profile),
            Err(err) if err.is_duplicate() => {
                debug!(%user_id, "profile created concurrently, re-reading");
                let profile = self.repository.find_profile_for_user(user_id).await?;
                profile.ok_or_else(|| err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
