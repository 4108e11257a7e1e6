//! JSON request and response bodies.

use super::error::ApiError;
use crate::identity::domain::UserId;
use crate::task::domain::{
    Comment, Task, TaskChanges, TaskPriority, TaskQuery, TaskStatus, TaskTitle,
};
use crate::task::services::CreateTaskRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    /// Identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description, empty when unset.
    pub description: String,
    /// Status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Owner identifier.
    pub user: i64,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().into_inner(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            priority: task.priority(),
            deadline: task.deadline(),
            user: task.owner().into_inner(),
        }
    }
}

/// Comment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDto {
    /// Identifier.
    pub id: i64,
    /// Parent task identifier.
    pub task: i64,
    /// Author identifier.
    pub user: i64,
    /// Body.
    pub text: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().into_inner(),
            task: comment.task_id().into_inner(),
            user: comment.author().into_inner(),
            text: comment.text().as_str().to_owned(),
            created_at: comment.created_at(),
        }
    }
}

/// `POST /api/tasks/` body. A client-sent `user` is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskBody {
    /// Validates enumerated fields and builds the service request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] for an unknown status or priority.
    pub fn into_request(self) -> Result<CreateTaskRequest, ApiError> {
        let mut request = CreateTaskRequest::new(self.title)
            .with_description(self.description.unwrap_or_default())
            .with_deadline(self.deadline);
        if let Some(status) = parse_status(self.status.as_deref())? {
            request = request.with_status(status);
        }
        if let Some(priority) = parse_priority(self.priority.as_deref())? {
            request = request.with_priority(priority);
        }
        Ok(request)
    }
}

/// `PUT` and `PATCH /api/tasks/{id}/` body.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default, deserialize_with = "present")]
    deadline: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskBody {
    /// Returns `true` when the body carries a title.
    #[must_use]
    pub const fn has_title(&self) -> bool {
        self.title.is_some()
    }

    /// Validates the body and converts it into field changes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] for a blank title or an unknown
    /// status or priority.
    pub fn into_changes(self) -> Result<TaskChanges, ApiError> {
        let title = self
            .title
            .map(TaskTitle::new)
            .transpose()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        Ok(TaskChanges {
            title,
            description: self.description,
            status: parse_status(self.status.as_deref())?,
            priority: parse_priority(self.priority.as_deref())?,
            deadline: self.deadline,
        })
    }
}

/// `POST /api/tasks/{task_id}/comments/` body.
#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    /// Comment body.
    pub text: String,
}

/// Query string of `GET /api/tasks/`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    status: Option<String>,
    priority: Option<String>,
    user: Option<String>,
    search: Option<String>,
    ordering: Option<String>,
}

impl TaskListParams {
    /// Builds a listing query scoped to `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] for an unknown status or priority or
    /// a non-numeric `user`.
    pub fn into_query(self, requester: UserId) -> Result<TaskQuery, ApiError> {
        let mut query = TaskQuery::for_requester(requester);
        if let Some(status) = parse_status(non_empty(self.status.as_deref()))? {
            query = query.with_status(status);
        }
        if let Some(priority) = parse_priority(non_empty(self.priority.as_deref()))? {
            query = query.with_priority(priority);
        }
        if let Some(raw_user) = non_empty(self.user.as_deref()) {
            let owner = raw_user.trim().parse::<i64>().map_err(|_| {
                ApiError::BadRequest(format!("user: '{raw_user}' is not a valid user id"))
            })?;
            query = query.with_owner(UserId::new(owner));
        }
        if let Some(search) = non_empty(self.search.as_deref()) {
            query = query.with_search(search);
        }
        if let Some(ordering) = non_empty(self.ordering.as_deref()) {
            query = query.with_ordering(ordering);
        }
        Ok(query)
    }
}

/// `POST /api/auth/login/` body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// User handle.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// `POST /api/auth/refresh/` body.
#[derive(Debug, Deserialize)]
pub struct RefreshBody {
    /// Refresh token.
    pub refresh: String,
}

/// `POST /api/auth/refresh/` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenDto {
    /// New access token.
    pub access: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, ApiError> {
    raw.map(|value| TaskStatus::try_from(value.trim()))
        .transpose()
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

fn parse_priority(raw: Option<&str>) -> Result<Option<TaskPriority>, ApiError> {
    raw.map(|value| TaskPriority::try_from(value.trim()))
        .transpose()
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
