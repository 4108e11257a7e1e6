//! Reply texts of the chat surface.

use crate::identity::domain::User;
use crate::task::domain::{Task, TaskStatus};

/// Reply to a command from a participant who never ran `/start`.
pub const NOT_REGISTERED: &str = "❌ You are not registered. Send /start.";
/// Reply to `/tasks` when the list is empty.
pub const NO_TASKS: &str = "❌ You have no tasks yet.";
/// Reply to `/newtask` without a title.
pub const NEW_TASK_USAGE: &str =
    "❌ Enter the task name after the command.\nExample: /newtask Complete API";
/// Reply to `/deletetask` without arguments.
pub const DELETE_TASK_USAGE: &str = "❌ Use the command format:\n/deletetask <task_id>";
/// Reply to `/updatetask` with fewer than two arguments.
pub const UPDATE_TASK_USAGE: &str = "❌ Use the command format:\n/updatetask <task_id> <new_status>";
/// Reply when the task is missing or belongs to someone else.
pub const TASK_NOT_FOUND: &str = "❌ Task not found or you do not have access.";
/// Reply when the command failed for an internal reason.
pub const GENERIC_FAILURE: &str = "❌ Something went wrong. Please try again later.";

/// Confirms `/start`.
#[must_use]
pub fn registered(user: &User) -> String {
    format!(
        "✅ You are registered as {}!\nNow you can manage your tasks.",
        user.handle()
    )
}

/// Rejects an unknown status, listing the accepted ones.
#[must_use]
pub fn invalid_status() -> String {
    format!("❌ Invalid status. Available: {}", TaskStatus::valid_values())
}

/// Confirms `/newtask`.
#[must_use]
pub fn task_created(task: &Task) -> String {
    format!("✅ Task created: {}", task.title())
}

/// Confirms `/deletetask`.
#[must_use]
pub fn task_deleted(task: &Task) -> String {
    format!("✅ Task '{}' has been deleted.", task.title())
}

/// Confirms `/updatetask`.
#[must_use]
pub fn status_updated(task: &Task) -> String {
    format!(
        "✅ Task '{}' status updated to '{}'.",
        task.title(),
        task.status().label()
    )
}

/// Renders the `/tasks` listing.
#[must_use]
pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_owned();
    }

    let blocks: Vec<String> = tasks.iter().map(task_block).collect();
    format!("📌 Your tasks:\n\n{}", blocks.join("\n\n"))
}

fn task_block(task: &Task) -> String {
    let deadline = task.deadline().map_or_else(
        || "No deadline".to_owned(),
        |due| due.format("%d.%m.%Y").to_string(),
    );
    format!(
        "🔹 Task ID - {id}\nTitle: {title}\nStatus: {status}\nPriority: {priority}\nDeadline: {deadline}",
        id = task.id(),
        title = task.title(),
        status = task.status().label(),
        priority = task.priority().label(),
    )
}
