//! Domain model for tasks, comments, and task list queries.

mod comment;
mod error;
mod ids;
mod query;
mod task;

pub use comment::{Comment, NewComment, PersistedCommentData};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{CommentId, CommentText, TaskId, TaskTitle};
pub use query::{SortField, SortKey, TaskQuery};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges, TaskPriority, TaskStatus};
