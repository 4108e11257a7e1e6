//! `PostgreSQL` repository implementation for tasks and comments.

use super::{
    models::{CommentRow, NewCommentRow, NewTaskRow, TaskRow},
    schema::{comments, tasks},
};
use crate::identity::domain::UserId;
use crate::persistence::{PersistenceError, PgPool, run_blocking};
use crate::task::{
    domain::{
        Comment, CommentId, CommentText, NewComment, NewTask, PersistedCommentData,
        PersistedTaskData, SortField, Task, TaskId, TaskPriority, TaskQuery, TaskStatus, TaskTitle,
    },
    ports::{CommentRepository, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Integer;

const PRIORITY_RANK_SQL: &str =
    "CASE tasks.priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END";

/// `PostgreSQL`-backed store of tasks and comments.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<PersistenceError> for TaskRepositoryError {
    fn from(err: PersistenceError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store_task(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let row = NewTaskRow {
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            status: task.status().as_str().to_owned(),
            priority: task.priority().as_str().to_owned(),
            deadline: task.deadline(),
            owner_id: task.owner().into_inner(),
        };
        run_blocking(&self.pool, move |connection| {
            let stored = diesel::insert_into(tasks::table)
                .values(&row)
                .returning(TaskRow::as_returning())
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(stored)
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        let title = task.title().as_str().to_owned();
        let description = task.description().to_owned();
        let status = task.status().as_str();
        let priority = task.priority().as_str();
        let deadline = task.deadline();
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(tasks::table.find(id.into_inner()))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::status.eq(status),
                    tasks::priority.eq(priority),
                    tasks::deadline.eq(deadline),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::TaskNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::TaskNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let owned_query = query.clone();
        run_blocking(&self.pool, move |connection| {
            let rows = load_task_rows(connection, &owned_query)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for PostgresTaskRepository {
    async fn store_comment(&self, comment: &NewComment) -> TaskRepositoryResult<Comment> {
        let task_id = comment.task_id();
        let row = NewCommentRow {
            task_id: task_id.into_inner(),
            author_id: comment.author().into_inner(),
            text: comment.text().as_str().to_owned(),
            created_at: comment.created_at(),
        };
        run_blocking(&self.pool, move |connection| {
            let stored = diesel::insert_into(comments::table)
                .values(&row)
                .returning(CommentRow::as_returning())
                .get_result(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::TaskNotFound(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            row_to_comment(stored)
        })
        .await
    }

    async fn find_comment(&self, id: CommentId) -> TaskRepositoryResult<Option<Comment>> {
        run_blocking(&self.pool, move |connection| {
            let row = comments::table
                .find(id.into_inner())
                .select(CommentRow::as_select())
                .first(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_comment).transpose()
        })
        .await
    }

    async fn list_comments(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Comment>> {
        run_blocking(&self.pool, move |connection| {
            let rows = comments::table
                .filter(comments::task_id.eq(task_id.into_inner()))
                .order((comments::created_at.desc(), comments::id.desc()))
                .select(CommentRow::as_select())
                .load(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_comment).collect()
        })
        .await
    }

    async fn delete_comment(&self, id: CommentId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(comments::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::CommentNotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn load_task_rows(connection: &mut PgConnection, query: &TaskQuery) -> QueryResult<Vec<TaskRow>> {
    let mut statement = tasks::table
        .filter(tasks::owner_id.eq(query.requester().into_inner()))
        .select(TaskRow::as_select())
        .into_boxed();

    if let Some(owner) = query.owner() {
        statement = statement.filter(tasks::owner_id.eq(owner.into_inner()));
    }
    if let Some(status) = query.status() {
        statement = statement.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(priority) = query.priority() {
        statement = statement.filter(tasks::priority.eq(priority.as_str()));
    }
    for term in query.search_terms() {
        let pattern = format!("%{}%", escape_like(term));
        statement = statement.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.ilike(pattern)),
        );
    }

    // Postgres places NULL deadlines last ascending and first descending,
    // which is what `TaskQuery::compare` does for the in-memory store.
    for key in query.ordering() {
        statement = match (key.field(), key.is_descending()) {
            (SortField::Deadline, false) => statement.then_order_by(tasks::deadline.asc()),
            (SortField::Deadline, true) => statement.then_order_by(tasks::deadline.desc()),
            (SortField::Priority, false) => {
                statement.then_order_by(sql::<Integer>(PRIORITY_RANK_SQL).asc())
            }
            (SortField::Priority, true) => {
                statement.then_order_by(sql::<Integer>(PRIORITY_RANK_SQL).desc())
            }
        };
    }
    statement
        .then_order_by(tasks::id.asc())
        .load::<TaskRow>(connection)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        deadline,
        owner_id,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        owner: UserId::new(owner_id),
        title,
        description,
        status,
        priority,
        deadline,
    }))
}

fn row_to_comment(row: CommentRow) -> TaskRepositoryResult<Comment> {
    let text = CommentText::new(row.text).map_err(TaskRepositoryError::persistence)?;
    Ok(Comment::from_persisted(PersistedCommentData {
        id: CommentId::new(row.id),
        task_id: TaskId::new(row.task_id),
        author: UserId::new(row.author_id),
        text,
        created_at: row.created_at,
    }))
}
