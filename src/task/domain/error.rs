//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("task title is {length} characters, maximum is {max}")]
    TitleTooLong {
        /// Observed character count.
        length: usize,
        /// Maximum accepted character count.
        max: usize,
    },

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyCommentText,
}

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid status '{0}', expected one of: new, in_progress, done, canceled")]
pub struct ParseTaskStatusError(pub String);

/// Error returned when a priority string is not one of the known values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid priority '{0}', expected one of: low, medium, high")]
pub struct ParseTaskPriorityError(pub String);
