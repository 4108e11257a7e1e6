//! Argon2 password hashing.

use crate::identity::domain::PasswordDigest;
use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use thiserror::Error;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The password is empty.
    #[error("password must not be empty")]
    Empty,
    /// The hasher rejected the input.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hashes a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns [`PasswordError::Empty`] for an empty password or
/// [`PasswordError::Hash`] when argon2 fails.
pub fn hash_password(plain: &str) -> Result<PasswordDigest, PasswordError> {
    if plain.is_empty() {
        return Err(PasswordError::Empty);
    }
    let salt = SaltString::generate(&mut OsRng);
    let encoded = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|err| PasswordError::Hash(err.to_string()))?
        .to_string();
    Ok(PasswordDigest::from_encoded(encoded))
}

/// Checks a plaintext password against a stored digest.
///
/// Malformed digests never verify.
#[must_use]
pub fn verify_password(plain: &str, digest: &PasswordDigest) -> bool {
    PasswordHash::new(digest.as_str()).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    })
}
