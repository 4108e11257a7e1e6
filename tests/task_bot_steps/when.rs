//! When steps for chat bot BDD scenarios.

use super::world::TaskBotWorld;
use rstest_bdd_macros::when;

#[when(r#"chat user "{chat_id}" sends "{text}""#)]
fn user_sends(world: &mut TaskBotWorld, chat_id: String, text: String) -> Result<(), eyre::Report> {
    world.send(&chat_id, &text)
}

#[when(r#"chat user "{chat_id}" deletes the last created task"#)]
fn user_deletes_last_task(world: &mut TaskBotWorld, chat_id: String) -> Result<(), eyre::Report> {
    let task_id = world
        .last_task
        .ok_or_else(|| eyre::eyre!("no task was created in this scenario"))?;
    world.send(&chat_id, &format!("/deletetask {task_id}"))
}
