//! Token issuing endpoints.

use crate::api::{
    ApiState,
    dto::{AccessTokenDto, LoginBody, RefreshBody},
    error::{ApiError, BAD_CREDENTIALS},
    extract::ApiJson,
};
use crate::app::Backend;
use crate::auth::TokenPair;
use axum::{Json, extract::State};
use mockable::DefaultClock;
use tracing::info;

/// `POST /api/auth/login/`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for unknown handles and wrong
/// passwords alike.
pub async fn login<B: Backend>(
    State(state): State<ApiState<B>>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = state
        .services
        .accounts
        .authenticate(&body.username, &body.password)
        .await?
        .ok_or(ApiError::Unauthorized(BAD_CREDENTIALS))?;
    let pair = state.tokens.issue_pair(user.id(), &DefaultClock)?;
    info!(user_id = %user.id(), "issued token pair");
    Ok(Json(pair))
}

/// `POST /api/auth/refresh/`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the refresh token is invalid,
/// expired, or an access token.
pub async fn refresh<B: Backend>(
    State(state): State<ApiState<B>>,
    ApiJson(body): ApiJson<RefreshBody>,
) -> Result<Json<AccessTokenDto>, ApiError> {
    let access = state.tokens.refresh(&body.refresh, &DefaultClock)?;
    Ok(Json(AccessTokenDto { access }))
}
