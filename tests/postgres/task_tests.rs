//! Task and comment repository behaviour on `PostgreSQL`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use tasktrack::{
    app::{InMemoryBackend, Services},
    identity::domain::UserId,
    task::{
        adapters::postgres::PostgresTaskRepository,
        domain::{CommentText, NewComment, TaskId, TaskPriority, TaskQuery},
        ports::{CommentRepository, TaskRepositoryError},
        services::{CommentCommandError, CreateTaskRequest, TaskService},
    },
};

use crate::postgres::helpers::{BoxError, SilentTransport, TestDatabase, test_database};

fn seed_requests() -> Vec<CreateTaskRequest> {
    let day = |d| Utc.with_ymd_and_hms(2026, 11, d, 9, 0, 0).single();
    vec![
        CreateTaskRequest::new("Ship release")
            .with_priority(TaskPriority::High)
            .with_deadline(day(20)),
        CreateTaskRequest::new("Review 100% coverage report")
            .with_description("ci_flaky suite")
            .with_priority(TaskPriority::Low)
            .with_deadline(day(5)),
        CreateTaskRequest::new("Plan offsite").with_priority(TaskPriority::High),
        CreateTaskRequest::new("Answer email")
            .with_description("release questions")
            .with_deadline(day(12)),
    ]
}

async fn titles<R>(service: &TaskService<R>, query: &TaskQuery) -> Vec<String>
where
    R: tasktrack::task::ports::TaskRepository,
{
    service
        .list(query)
        .await
        .expect("listing succeeds")
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}

#[rstest]
#[case::default_order(None, None)]
#[case::natural_order(Some("-deadline"), None)]
#[case::priority_then_deadline(Some("-priority,deadline"), None)]
#[case::unknown_terms_ignored(Some("title,priority"), None)]
#[case::search_any_field(None, Some("release"))]
#[case::search_literal_percent(None, Some("100%"))]
#[case::search_literal_underscore(None, Some("ci_"))]
#[case::search_all_terms(None, Some("release, ship"))]
#[tokio::test(flavor = "multi_thread")]
async fn listing_matches_the_in_memory_store(
    #[case] ordering: Option<&str>,
    #[case] search: Option<&str>,
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = test_database.await?;
    let pg = db.services();
    let memory: Arc<Services<InMemoryBackend<SilentTransport>>> =
        Arc::new(Services::in_memory(Arc::new(SilentTransport)));

    let pg_owner = pg
        .accounts
        .create_account("owner", "pw")
        .await
        .expect("pg account");
    let memory_owner = memory
        .accounts
        .create_account("owner", "pw")
        .await
        .expect("memory account");
    for request in seed_requests() {
        pg.tasks
            .create(pg_owner.id(), request.clone())
            .await
            .expect("pg create");
        memory
            .tasks
            .create(memory_owner.id(), request)
            .await
            .expect("memory create");
    }

    let build = |owner: UserId| {
        let mut query = TaskQuery::for_requester(owner);
        if let Some(raw) = ordering {
            query = query.with_ordering(raw);
        }
        if let Some(raw) = search {
            query = query.with_search(raw);
        }
        query
    };

    let from_pg = titles(&pg.tasks, &build(pg_owner.id())).await;
    let from_memory = titles(&memory.tasks, &build(memory_owner.id())).await;
    assert_eq!(from_pg, from_memory);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_comments(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = test_database.await?;
    let services = db.services();
    let owner = services
        .accounts
        .create_account("owner", "pw")
        .await
        .expect("account");
    let task = services
        .tasks
        .create(owner.id(), CreateTaskRequest::new("Temporary"))
        .await
        .expect("task");
    let first = services
        .comments
        .create(&owner, task.id(), "first")
        .await
        .expect("first comment");
    let second = services
        .comments
        .create(&owner, task.id(), "second")
        .await
        .expect("second comment");

    let listed: Vec<_> = services
        .comments
        .list(task.id())
        .await
        .expect("list")
        .iter()
        .map(tasktrack::task::domain::Comment::id)
        .collect();
    assert_eq!(listed, vec![second.id(), first.id()]);

    services
        .tasks
        .delete(owner.id(), task.id())
        .await
        .expect("delete");
    assert!(
        services
            .comments
            .list(task.id())
            .await
            .expect("list")
            .is_empty()
    );
    assert!(matches!(
        services.comments.delete(owner.id(), task.id(), first.id()).await,
        Err(CommentCommandError::NotFoundOrForbidden)
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_on_missing_task_violates_the_foreign_key(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = test_database.await?;
    let services = db.services();
    let author = services
        .accounts
        .create_account("author", "pw")
        .await
        .expect("account");
    let repository = PostgresTaskRepository::new(db.pool.clone());
    let missing = TaskId::new(987_654);
    let request = NewComment::new(
        missing,
        author.id(),
        CommentText::new("orphan").expect("valid text"),
        &DefaultClock,
    );

    let result = repository.store_comment(&request).await;
    assert!(matches!(result, Err(TaskRepositoryError::TaskNotFound(id)) if id == missing));
    Ok(())
}
