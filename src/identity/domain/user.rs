//! Internal user account aggregate.

use super::{UserHandle, UserId};
use std::fmt;

/// Encoded password hash in PHC string format.
///
/// The wrapped value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wraps an already-encoded PHC hash string.
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Data required to insert a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    handle: UserHandle,
    password: Option<PasswordDigest>,
}

impl NewUser {
    /// Creates an insert request for a user without API credentials.
    #[must_use]
    pub const fn new(handle: UserHandle) -> Self {
        Self {
            handle,
            password: None,
        }
    }

    /// Attaches an encoded password hash.
    #[must_use]
    pub fn with_password(mut self, digest: PasswordDigest) -> Self {
        self.password = Some(digest);
        self
    }

    /// Returns the requested handle.
    #[must_use]
    pub const fn handle(&self) -> &UserHandle {
        &self.handle
    }

    /// Returns the password hash, if any.
    #[must_use]
    pub const fn password(&self) -> Option<&PasswordDigest> {
        self.password.as_ref()
    }
}

/// Persisted user fields used to reconstruct a [`User`].
#[derive(Debug, Clone)]
pub struct PersistedUserData {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Unique login handle.
    pub handle: UserHandle,
    /// Optional password hash for API login.
    pub password: Option<PasswordDigest>,
}

/// Internal account that owns tasks and authors comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    handle: UserHandle,
    password: Option<PasswordDigest>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            handle: data.handle,
            password: data.password,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique handle.
    #[must_use]
    pub const fn handle(&self) -> &UserHandle {
        &self.handle
    }

    /// Returns the password hash when the account can log in to the API.
    #[must_use]
    pub const fn password(&self) -> Option<&PasswordDigest> {
        self.password.as_ref()
    }
}
