//! Password accounts used by the HTTP surface.

use crate::auth::{PasswordError, hash_password, verify_password};
use crate::identity::{
    domain::{IdentityDomainError, NewUser, User, UserHandle, UserId},
    ports::{IdentityRepositoryError, UserRepository},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised by account management.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The handle is invalid.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// The password could not be hashed.
    #[error(transparent)]
    Password(#[from] PasswordError),
    /// No user has the given handle.
    #[error("no user with handle {0}")]
    UnknownHandle(UserHandle),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Creates password accounts and checks credentials.
#[derive(Clone)]
pub struct AccountService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a user that can log in with a password.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] for an invalid handle,
    /// [`AccountError::Password`] for an empty password, and
    /// [`AccountError::Repository`] when the handle is taken or the store
    /// fails.
    pub async fn create_account(&self, handle: &str, password: &str) -> AccountResult<User> {
        let validated = UserHandle::new(handle)?;
        let digest = hash_password(password)?;
        let user = self
            .repository
            .create_user(&NewUser::new(validated).with_password(digest))
            .await?;
        info!(user = %user.handle(), "created password account");
        Ok(user)
    }

    /// Sets or replaces the password of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownHandle`] when the user does not exist.
    pub async fn set_password(&self, handle: &str, password: &str) -> AccountResult<User> {
        let validated = UserHandle::new(handle)?;
        let user = self
            .repository
            .find_user_by_handle(&validated)
            .await?
            .ok_or(AccountError::UnknownHandle(validated))?;
        let digest = hash_password(password)?;
        self.repository.set_password(user.id(), &digest).await?;
        info!(user = %user.handle(), "password updated");
        Ok(user)
    }

    /// Checks a handle and password.
    ///
    /// Unknown handles, accounts without a password, and wrong passwords all
    /// yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Repository`] when the lookup fails.
    pub async fn authenticate(&self, handle: &str, password: &str) -> AccountResult<Option<User>> {
        let Ok(validated) = UserHandle::new(handle) else {
            return Ok(None);
        };
        let user = self.repository.find_user_by_handle(&validated).await?;
        Ok(user.filter(|candidate| {
            candidate
                .password()
                .is_some_and(|digest| verify_password(password, digest))
        }))
    }

    /// Loads a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Repository`] when the lookup fails.
    pub async fn find_user(&self, id: UserId) -> AccountResult<Option<User>> {
        Ok(self.repository.find_user(id).await?)
    }
}
