//! Port contracts for task and comment persistence.

mod repository;

pub use repository::{CommentRepository, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
