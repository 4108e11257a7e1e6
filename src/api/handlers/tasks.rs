//! `/api/tasks/` endpoints. Every operation is scoped to the caller.

use crate::api::{
    ApiState,
    dto::{CreateTaskBody, TaskDto, TaskListParams, UpdateTaskBody},
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery, AuthUser},
};
use crate::app::Backend;
use crate::task::domain::TaskId;
use crate::task::services::TaskLookup;
use axum::{Json, extract::State, http::StatusCode};

/// `GET /api/tasks/`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for malformed filters.
pub async fn list<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiQuery(params): ApiQuery<TaskListParams>,
) -> Result<Json<Vec<TaskDto>>, ApiError> {
    let query = params.into_query(user.id())?;
    let tasks = state.services.tasks.list(&query).await?;
    Ok(Json(tasks.iter().map(TaskDto::from).collect()))
}

/// `POST /api/tasks/`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for an invalid title, status, or
/// priority.
pub async fn create<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskDto>), ApiError> {
    let task = state
        .services
        .tasks
        .create(user.id(), body.into_request()?)
        .await?;
    Ok((StatusCode::CREATED, Json(TaskDto::from(&task))))
}

/// `GET /api/tasks/{id}/`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for missing and foreign tasks.
pub async fn retrieve<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TaskDto>, ApiError> {
    match state
        .services
        .tasks
        .find_owned(user.id(), TaskId::new(id))
        .await?
    {
        TaskLookup::Found(task) => Ok(Json(TaskDto::from(&task))),
        TaskLookup::NotFoundOrForbidden => Err(ApiError::NotFound),
    }
}

/// `PUT /api/tasks/{id}/`. The title is mandatory.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when the title is missing or invalid,
/// and [`ApiError::NotFound`] for missing and foreign tasks.
pub async fn replace<B: Backend>(
    state: State<ApiState<B>>,
    user: AuthUser,
    path: ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateTaskBody>,
) -> Result<Json<TaskDto>, ApiError> {
    if !body.has_title() {
        return Err(ApiError::BadRequest(
            "title: This field is required.".to_owned(),
        ));
    }
    apply_update(state, user, path, body).await
}

/// `PATCH /api/tasks/{id}/`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] for invalid fields and
/// [`ApiError::NotFound`] for missing and foreign tasks.
pub async fn patch<B: Backend>(
    state: State<ApiState<B>>,
    user: AuthUser,
    path: ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateTaskBody>,
) -> Result<Json<TaskDto>, ApiError> {
    apply_update(state, user, path, body).await
}

/// `DELETE /api/tasks/{id}/`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for missing and foreign tasks.
pub async fn destroy<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .tasks
        .delete(user.id(), TaskId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update<B: Backend>(
    State(state): State<ApiState<B>>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<i64>,
    body: UpdateTaskBody,
) -> Result<Json<TaskDto>, ApiError> {
    let changes = body.into_changes()?;
    let task = state
        .services
        .tasks
        .update(user.id(), TaskId::new(id), changes)
        .await?;
    Ok(Json(TaskDto::from(&task)))
}
