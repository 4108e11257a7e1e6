//! Domain validation tests for tasks and comments.

use crate::identity::domain::UserId;
use crate::task::domain::{
    CommentText, PersistedTaskData, Task, TaskChanges, TaskDomainError, TaskId, TaskPriority,
    TaskStatus, TaskTitle,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;

fn task_titled(title: &str) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(1),
        owner: UserId::new(1),
        title: TaskTitle::new(title).expect("valid title"),
        description: String::new(),
        status: TaskStatus::New,
        priority: TaskPriority::Medium,
        deadline: None,
    })
}

#[rstest]
#[case("new", TaskStatus::New, "New")]
#[case("in_progress", TaskStatus::InProgress, "In Progress")]
#[case("done", TaskStatus::Done, "Done")]
#[case("canceled", TaskStatus::Canceled, "Canceled")]
fn status_parses_and_labels(#[case] raw: &str, #[case] expected: TaskStatus, #[case] label: &str) {
    let status = TaskStatus::try_from(raw).expect("known status");

    assert_eq!(status, expected);
    assert_eq!(status.label(), label);
    assert_eq!(status.as_str(), raw);
}

#[rstest]
#[case("bogus")]
#[case("Done")]
#[case("")]
fn unknown_status_is_rejected(#[case] raw: &str) {
    let err = TaskStatus::try_from(raw).expect_err("status should be rejected");

    assert_eq!(err.0, raw);
}

#[rstest]
fn valid_status_values_are_listed_in_order() {
    assert_eq!(TaskStatus::valid_values(), "new, in_progress, done, canceled");
}

#[rstest]
fn defaults_are_new_and_medium() {
    assert_eq!(TaskStatus::default(), TaskStatus::New);
    assert_eq!(TaskPriority::default(), TaskPriority::Medium);
}

#[rstest]
fn priority_rank_follows_urgency() {
    assert!(TaskPriority::Low.rank() < TaskPriority::Medium.rank());
    assert!(TaskPriority::Medium.rank() < TaskPriority::High.rank());
    assert_eq!(TaskPriority::High.label(), "High");
}

#[rstest]
#[case("   ")]
#[case("")]
fn blank_title_is_rejected(#[case] raw: &str) {
    assert_eq!(TaskTitle::new(raw), Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn title_is_trimmed_and_bounded() {
    let title = TaskTitle::new("  Complete API  ").expect("valid title");
    assert_eq!(title.as_str(), "Complete API");

    let longest = "x".repeat(TaskTitle::MAX_LENGTH);
    assert!(TaskTitle::new(longest).is_ok());

    let too_long = "x".repeat(TaskTitle::MAX_LENGTH + 1);
    assert_eq!(
        TaskTitle::new(too_long),
        Err(TaskDomainError::TitleTooLong {
            length: TaskTitle::MAX_LENGTH + 1,
            max: TaskTitle::MAX_LENGTH,
        })
    );
}

#[rstest]
fn display_keeps_short_titles() {
    assert_eq!(task_titled("Buy milk").to_string(), "Buy milk");
}

#[rstest]
fn display_truncates_long_titles() {
    let title = "a".repeat(60);
    let rendered = task_titled(&title).to_string();

    assert_eq!(rendered, format!("{}...", "a".repeat(50)));
}

#[rstest]
fn blank_comment_text_is_rejected() {
    assert_eq!(
        CommentText::new(" \n\t"),
        Err(TaskDomainError::EmptyCommentText)
    );
    assert_eq!(
        CommentText::new(" LGTM ").expect("valid text").as_str(),
        " LGTM "
    );
}

#[rstest]
fn changes_only_touch_given_fields() {
    let mut task = task_titled("Original");
    let deadline = Utc
        .with_ymd_and_hms(2026, 12, 31, 0, 0, 0)
        .single()
        .expect("valid date");
    task.apply(TaskChanges {
        priority: Some(TaskPriority::High),
        deadline: Some(Some(deadline)),
        ..TaskChanges::default()
    });

    assert_eq!(task.title().as_str(), "Original");
    assert_eq!(task.priority(), TaskPriority::High);
    assert_eq!(task.deadline(), Some(deadline));

    task.apply(TaskChanges {
        deadline: Some(None),
        ..TaskChanges::default()
    });
    assert_eq!(task.deadline(), None);
    assert_eq!(task.priority(), TaskPriority::High);
}

#[rstest]
#[case("42", 42)]
#[case(" 7 ", 7)]
fn task_id_parses_integers(#[case] raw: &str, #[case] expected: i64) {
    let id: TaskId = raw.parse().expect("valid id");
    assert_eq!(id, TaskId::new(expected));
}

#[rstest]
#[case("abc")]
#[case("4.2")]
#[case("")]
fn task_id_rejects_non_integers(#[case] raw: &str) {
    assert!(raw.parse::<TaskId>().is_err());
}
