//! Application services for the task command layer.

mod comments;
mod tasks;

pub use comments::{CommentCommandError, CommentCommandResult, CommentService};
pub use tasks::{CreateTaskRequest, TaskCommandError, TaskCommandResult, TaskLookup, TaskService};
