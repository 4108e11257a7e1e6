//! Conversion of request bodies and query strings.

use crate::api::ApiError;
use crate::api::dto::{CreateTaskBody, TaskListParams, UpdateTaskBody};
use crate::identity::domain::UserId;
use crate::task::domain::{SortField, SortKey, TaskPriority, TaskQuery, TaskStatus};
use rstest::rstest;

fn params(json: &str) -> TaskListParams {
    serde_json::from_str(json).expect("params should decode")
}

#[rstest]
fn empty_parameters_use_listing_defaults() {
    let query = params(r#"{"status": "", "priority": " ", "search": ""}"#)
        .into_query(UserId::new(1))
        .expect("query should build");

    assert_eq!(query, TaskQuery::for_requester(UserId::new(1)));
}

#[rstest]
fn every_parameter_reaches_the_query() {
    let query = params(
        r#"{"status": "done", "priority": "high", "user": "1", "search": "api docs", "ordering": "-priority,deadline"}"#,
    )
    .into_query(UserId::new(1))
    .expect("query should build");

    assert_eq!(query.status(), Some(TaskStatus::Done));
    assert_eq!(query.priority(), Some(TaskPriority::High));
    assert_eq!(query.owner(), Some(UserId::new(1)));
    assert_eq!(query.search_terms(), ["api", "docs"]);
    assert_eq!(
        query.ordering(),
        [
            SortKey::descending(SortField::Priority),
            SortKey::ascending(SortField::Deadline)
        ]
    );
}

#[rstest]
#[case(r#"{"status": "bogus"}"#)]
#[case(r#"{"priority": "urgent"}"#)]
#[case(r#"{"user": "me"}"#)]
fn malformed_filters_are_bad_requests(#[case] json: &str) {
    let result = params(json).into_query(UserId::new(1));
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[rstest]
fn update_body_distinguishes_null_from_absent_deadline() {
    let cleared: UpdateTaskBody =
        serde_json::from_str(r#"{"deadline": null}"#).expect("body should decode");
    let untouched: UpdateTaskBody = serde_json::from_str("{}").expect("body should decode");

    assert_eq!(
        cleared.into_changes().expect("valid").deadline,
        Some(None)
    );
    assert_eq!(untouched.into_changes().expect("valid").deadline, None);
}

#[rstest]
fn update_body_rejects_blank_title() {
    let body: UpdateTaskBody =
        serde_json::from_str(r#"{"title": "   "}"#).expect("body should decode");
    assert!(body.has_title());
    assert!(matches!(body.into_changes(), Err(ApiError::BadRequest(_))));
}

#[rstest]
fn create_body_ignores_client_owner() {
    let body: CreateTaskBody = serde_json::from_str(
        r#"{"title": "Ship it", "user": 99, "priority": "low", "description": null}"#,
    )
    .expect("body should decode");

    assert!(body.into_request().is_ok());
}

#[rstest]
fn create_body_rejects_unknown_status() {
    let body: CreateTaskBody = serde_json::from_str(r#"{"title": "Ship it", "status": "later"}"#)
        .expect("body should decode");

    assert!(matches!(body.into_request(), Err(ApiError::BadRequest(_))));
}
