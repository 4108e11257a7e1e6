//! Repository ports for users and their chat profiles.

use crate::identity::domain::{
    ExternalChatId, NewUser, NewUserProfile, PasswordDigest, ProfileId, User, UserHandle, UserId,
    UserProfile,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity repository operations.
pub type IdentityRepositoryResult<T> = Result<T, IdentityRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateHandle`] when the handle
    /// is already taken.
    async fn create_user(&self, user: &NewUser) -> IdentityRepositoryResult<User>;

    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> IdentityRepositoryResult<Option<User>>;

    /// Finds a user by unique handle.
    async fn find_user_by_handle(
        &self,
        handle: &UserHandle,
    ) -> IdentityRepositoryResult<Option<User>>;

    /// Replaces the stored password hash of a user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::UserNotFound`] when the user does
    /// not exist.
    async fn set_password(
        &self,
        id: UserId,
        digest: &PasswordDigest,
    ) -> IdentityRepositoryResult<()>;
}

/// Profile persistence contract.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Inserts a new profile and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateProfile`] when the user
    /// already has a profile, or
    /// [`IdentityRepositoryError::DuplicateExternalId`] when the participant
    /// id is attached to another profile.
    async fn create_profile(
        &self,
        profile: &NewUserProfile,
    ) -> IdentityRepositoryResult<UserProfile>;

    /// Persists the mutable fields of a profile (the conversation handle).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::ProfileNotFound`] when the profile
    /// does not exist.
    async fn update_profile(&self, profile: &UserProfile) -> IdentityRepositoryResult<()>;

    /// Finds the profile bound to a chat-platform participant id.
    async fn find_profile_by_external_id(
        &self,
        external_id: ExternalChatId,
    ) -> IdentityRepositoryResult<Option<UserProfile>>;

    /// Finds the profile of a user.
    async fn find_profile_for_user(
        &self,
        user_id: UserId,
    ) -> IdentityRepositoryResult<Option<UserProfile>>;
}

/// Errors returned by identity repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityRepositoryError {
    /// A user with the same handle already exists.
    #[error("duplicate user handle: {0}")]
    DuplicateHandle(UserHandle),

    /// The user already has a profile.
    #[error("user {0} already has a profile")]
    DuplicateProfile(UserId),

    /// The participant id is already attached to a profile.
    #[error("external chat id {0} is already attached to a profile")]
    DuplicateExternalId(ExternalChatId),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The profile was not found.
    #[error("profile not found: {0}")]
    ProfileNotFound(ProfileId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for unique-constraint violations that a concurrent
    /// writer may have caused.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateHandle(_) | Self::DuplicateProfile(_) | Self::DuplicateExternalId(_)
        )
    }
}
