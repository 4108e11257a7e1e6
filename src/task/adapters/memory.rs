//! In-memory task and comment repository for tests and local tooling.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        Comment, CommentId, NewComment, NewTask, PersistedCommentData, PersistedTaskData, Task,
        TaskId, TaskQuery,
    },
    ports::{CommentRepository, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory store of tasks and comments.
///
/// Deleting a task removes its comments, as the `PostgreSQL` foreign key
/// cascade does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    last_task_id: i64,
    last_comment_id: i64,
    tasks: BTreeMap<TaskId, Task>,
    comments: BTreeMap<CommentId, Comment>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state
            .read()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state
            .write()
            .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store_task(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        state.last_task_id += 1;
        let id = TaskId::new(state.last_task_id);
        let stored = Task::from_persisted(PersistedTaskData {
            id,
            owner: task.owner(),
            title: task.title().clone(),
            description: task.description().to_owned(),
            status: task.status(),
            priority: task.priority(),
            deadline: task.deadline(),
        });
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::TaskNotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::TaskNotFound(id))?;
        state.comments.retain(|_, comment| comment.task_id() != id);
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|left, right| query.compare(left, right));
        Ok(tasks)
    }
}

#[async_trait]
impl CommentRepository for InMemoryTaskRepository {
    async fn store_comment(&self, comment: &NewComment) -> TaskRepositoryResult<Comment> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&comment.task_id()) {
            return Err(TaskRepositoryError::TaskNotFound(comment.task_id()));
        }
        state.last_comment_id += 1;
        let id = CommentId::new(state.last_comment_id);
        let stored = Comment::from_persisted(PersistedCommentData {
            id,
            task_id: comment.task_id(),
            author: comment.author(),
            text: comment.text().clone(),
            created_at: comment.created_at(),
        });
        state.comments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn list_comments(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Comment>> {
        let state = self.read()?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect();
        comments.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });
        Ok(comments)
    }

    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()> {
        self.write()?
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::CommentNotFound(id))
    }
}
