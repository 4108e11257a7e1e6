//! Credentials for the HTTP surface.
//!
//! Passwords are stored as argon2 PHC strings. Clients exchange a handle and
//! password for a short-lived access token plus a longer-lived refresh token,
//! both HS256-signed JWTs.

mod password;
mod tokens;

pub use password::{PasswordError, hash_password, verify_password};
pub use tokens::{Claims, JwtSettings, TokenError, TokenIssuer, TokenKind, TokenPair};

#[cfg(test)]
mod tests;
