//! Comments left on tasks.

use super::{CommentId, CommentText, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Data required to insert a new comment.
///
/// Task and author are always supplied by the server, never by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    task_id: TaskId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl NewComment {
    /// Creates an insert request stamped with the current time.
    #[must_use]
    pub fn new(task_id: TaskId, author: UserId, text: CommentText, clock: &impl Clock) -> Self {
        Self {
            task_id,
            author,
            text,
            created_at: clock.utc(),
        }
    }

    /// Returns the parent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the text.
    #[must_use]
    pub const fn text(&self) -> &CommentText {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Persisted comment fields used to reconstruct a [`Comment`].
#[derive(Debug, Clone)]
pub struct PersistedCommentData {
    /// Store-assigned identifier.
    pub id: CommentId,
    /// Parent task.
    pub task_id: TaskId,
    /// Author.
    pub author: UserId,
    /// Body.
    pub text: CommentText,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A remark left on a task. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    task_id: TaskId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            author: data.author,
            text: data.text,
            created_at: data.created_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the parent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the text.
    #[must_use]
    pub const fn text(&self) -> &CommentText {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
