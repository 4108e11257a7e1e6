//! `/api/tasks/{task_id}/comments/` endpoints.
//!
//! Any authenticated user may read and write comments on any task. Only the
//! author may delete a comment.

use crate::api::{
    ApiState,
    dto::{CommentDto, CreateCommentBody},
    error::ApiError,
    extract::{ApiJson, ApiPath, AuthUser},
};
use crate::app::Backend;
use crate::task::domain::{CommentId, TaskId};
use axum::{Json, extract::State, http::StatusCode};

/// `GET /api/tasks/{task_id}/comments/`, newest first.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] when the store fails.
pub async fn list<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(_): AuthUser,
    ApiPath(task_id): ApiPath<i64>,
) -> Result<Json<Vec<CommentDto>>, ApiError> {
    let comments = state.services.comments.list(TaskId::new(task_id)).await?;
    Ok(Json(comments.iter().map(CommentDto::from).collect()))
}

/// `POST /api/tasks/{task_id}/comments/`. The task owner is notified; a
/// failed notification does not fail the request.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for blank text and
/// [`ApiError::NotFound`] when the task does not exist.
pub async fn create<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(body): ApiJson<CreateCommentBody>,
) -> Result<(StatusCode, Json<CommentDto>), ApiError> {
    let comment = state
        .services
        .comments
        .create(&user, TaskId::new(task_id), &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(&comment))))
}

/// `DELETE /api/tasks/{task_id}/comments/{id}/`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] unless the caller wrote the comment on
/// that task.
pub async fn destroy<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiPath((task_id, comment_id)): ApiPath<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .comments
        .delete(user.id(), TaskId::new(task_id), CommentId::new(comment_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
