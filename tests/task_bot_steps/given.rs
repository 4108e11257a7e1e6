//! Given steps for chat bot BDD scenarios.

use super::world::{TaskBotWorld, parse_chat_id, run_async};
use rstest_bdd_macros::given;
use tasktrack::identity::services::Registration;
use tasktrack::task::services::CreateTaskRequest;

#[given(r#"chat user "{chat_id}" has sent "{text}""#)]
fn user_has_sent(
    world: &mut TaskBotWorld,
    chat_id: String,
    text: String,
) -> Result<(), eyre::Report> {
    world.send(&chat_id, &text)
}

#[given(r#"chat user "{chat_id}" has created the task "{title}""#)]
fn user_has_created_task(
    world: &mut TaskBotWorld,
    chat_id: String,
    title: String,
) -> Result<(), eyre::Report> {
    let sender = parse_chat_id(&chat_id)?;
    let owner = match run_async(world.services.identity.lookup_registered(sender))? {
        Registration::Registered(user) => user,
        Registration::NotRegistered => {
            return Err(eyre::eyre!("chat user {chat_id} is not registered"));
        }
    };
    let task = run_async(
        world
            .services
            .tasks
            .create(owner.id(), CreateTaskRequest::new(title)),
    )?;
    world.last_task = Some(task.id());
    Ok(())
}
