//! Request extractors that report failures as [`ApiError`].

use super::{
    ApiState,
    error::{ApiError, INVALID_TOKEN, MISSING_CREDENTIALS},
};
use crate::app::Backend;
use crate::auth::TokenKind;
use crate::identity::domain::User;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header, request::Parts},
};

/// JSON body whose rejection is a `400 {"detail": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejection is a `400 {"detail": ...}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters. A malformed identifier is answered like a missing
/// resource.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// The user named by a valid `Authorization: Bearer` access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<B: Backend> FromRequestParts<ApiState<B>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState<B>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_authorization_bearer)
            .ok_or(ApiError::Unauthorized(MISSING_CREDENTIALS))?;

        let user_id = state.tokens.verify(token, TokenKind::Access)?;
        // Tokens outlive deleted accounts.
        let user = state
            .services
            .accounts
            .find_user(user_id)
            .await?
            .ok_or(ApiError::Unauthorized(INVALID_TOKEN))?;
        Ok(Self(user))
    }
}

pub(crate) fn parse_authorization_bearer(value: &str) -> Option<&str> {
    let (scheme, rest) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}
