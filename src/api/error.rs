//! Mapping from service failures to HTTP responses.

use crate::auth::TokenError;
use crate::identity::services::AccountError;
use crate::task::services::{CommentCommandError, TaskCommandError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub(crate) const NOT_FOUND_DETAIL: &str = "Not found.";
pub(crate) const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";
pub(crate) const INVALID_TOKEN: &str = "Given token not valid for any token type";
pub(crate) const BAD_CREDENTIALS: &str = "No active account found with the given credentials";
const SERVER_ERROR_DETAIL: &str = "A server error occurred.";

/// Error returned by every API handler.
///
/// Missing resources and resources owned by someone else share one variant,
/// so both produce byte-identical responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body, path, or query failed validation.
    #[error("{0}")]
    BadRequest(String),
    /// Credentials are missing or invalid.
    #[error("{0}")]
    Unauthorized(&'static str),
    /// The resource does not exist or is not visible to the caller.
    #[error("Not found.")]
    NotFound,
    /// An infrastructure failure. The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.as_str()),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, *message),
            Self::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_DETAIL),
            Self::Internal(message) => {
                error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_DETAIL)
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<TaskCommandError> for ApiError {
    fn from(err: TaskCommandError) -> Self {
        match err {
            TaskCommandError::InvalidStatus(_) | TaskCommandError::Domain(_) => {
                Self::BadRequest(err.to_string())
            }
            TaskCommandError::NotFoundOrForbidden => Self::NotFound,
            TaskCommandError::Repository(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CommentCommandError> for ApiError {
    fn from(err: CommentCommandError) -> Self {
        match err {
            CommentCommandError::Domain(_) => Self::BadRequest(err.to_string()),
            CommentCommandError::NotFoundOrForbidden => Self::NotFound,
            CommentCommandError::Repository(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => Self::Internal(err.to_string()),
            TokenError::Invalid(_) | TokenError::WrongKind { .. } => {
                warn!(error = %err, "rejected token");
                Self::Unauthorized(INVALID_TOKEN)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound
    }
}
