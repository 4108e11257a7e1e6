//! JWT access and refresh tokens.

use crate::identity::domain::UserId;
use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Authorises API requests.
    Access,
    /// May only be exchanged for a new access token.
    Refresh,
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Unique token identifier.
    pub jti: Uuid,
    /// Token purpose.
    pub token_type: TokenKind,
}

/// Access and refresh token returned by a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: String,
    /// Longer-lived refresh token.
    pub refresh: String,
}

/// Signing secret and lifetimes.
#[derive(Clone)]
pub struct JwtSettings {
    /// HS256 shared secret.
    pub secret: String,
    /// Access token lifetime.
    pub access_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: Duration,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Token issuing and verification failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(String),
    /// The token is malformed, expired, or carries a bad signature.
    #[error("invalid token: {0}")]
    Invalid(String),
    /// The token is valid but was issued for another purpose.
    #[error("expected a {expected:?} token")]
    WrongKind {
        /// Purpose the caller required.
        expected: TokenKind,
    },
}

/// Issues and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer from settings.
    #[must_use]
    pub fn new(settings: &JwtSettings) -> Self {
        let secret = settings.secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        }
    }

    /// Issues a fresh access and refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when encoding fails.
    pub fn issue_pair(
        &self,
        user_id: UserId,
        clock: &impl Clock,
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access, clock)?,
            refresh: self.issue(user_id, TokenKind::Refresh, clock)?,
        })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] or [`TokenError::WrongKind`] when the
    /// presented token is not a valid refresh token.
    pub fn refresh(
        &self,
        refresh_token: &str,
        clock: &impl Clock,
    ) -> Result<String, TokenError> {
        let user_id = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue(user_id, TokenKind::Access, clock)
    }

    /// Verifies a token and returns its subject.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for a bad signature, malformed input,
    /// or expiry, and [`TokenError::WrongKind`] when the purpose differs.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| TokenError::Invalid(err.to_string()))?;
        if data.claims.token_type != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(UserId::new(data.claims.sub))
    }

    fn issue(
        &self,
        user_id: UserId,
        kind: TokenKind,
        clock: &impl Clock,
    ) -> Result<String, TokenError> {
        let now = clock.utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.into_inner(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
            token_type: kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }
}
