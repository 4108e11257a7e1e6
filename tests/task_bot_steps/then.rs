//! Then steps for chat bot BDD scenarios.

use super::world::{TaskBotWorld, parse_chat_id, run_async};
use rstest_bdd_macros::then;
use tasktrack::identity::domain::UserHandle;
use tasktrack::identity::ports::{ProfileRepository, UserRepository};
use tasktrack::identity::services::Registration;

fn last_reply(world: &TaskBotWorld) -> Result<&str, eyre::Report> {
    world
        .last_reply
        .as_deref()
        .ok_or_else(|| eyre::eyre!("the bot did not reply"))
}

#[then(r#"the reply is "{expected}""#)]
fn reply_is(world: &TaskBotWorld, expected: String) -> Result<(), eyre::Report> {
    let reply = last_reply(world)?;
    if reply != expected {
        return Err(eyre::eyre!("expected reply {expected:?}, got {reply:?}"));
    }
    Ok(())
}

#[then(r#"the reply contains "{fragment}""#)]
fn reply_contains(world: &TaskBotWorld, fragment: String) -> Result<(), eyre::Report> {
    let reply = last_reply(world)?;
    if !reply.contains(&fragment) {
        return Err(eyre::eyre!("expected {fragment:?} in reply {reply:?}"));
    }
    Ok(())
}

#[then(r#"the reply confirms registration as "{handle}""#)]
fn reply_confirms_registration(world: &TaskBotWorld, handle: String) -> Result<(), eyre::Report> {
    let reply = last_reply(world)?;
    let expected = format!("✅ You are registered as {handle}!");
    if !reply.starts_with(&expected) {
        return Err(eyre::eyre!("expected registration reply, got {reply:?}"));
    }
    Ok(())
}

#[then(r#"exactly one account exists for chat user "{chat_id}""#)]
fn one_account_exists(world: &TaskBotWorld, chat_id: String) -> Result<(), eyre::Report> {
    let sender = parse_chat_id(&chat_id)?;
    let handle = format!("telegram_{chat_id}");
    match run_async(world.services.identity.lookup_registered(sender))? {
        Registration::Registered(user) if user.handle().as_str() == handle => Ok(()),
        Registration::Registered(user) => Err(eyre::eyre!(
            "chat user {chat_id} is linked to {}",
            user.handle()
        )),
        Registration::NotRegistered => Err(eyre::eyre!("chat user {chat_id} is not registered")),
    }
}

#[then(r#"no account exists for chat user "{chat_id}""#)]
fn no_account_exists(world: &TaskBotWorld, chat_id: String) -> Result<(), eyre::Report> {
    let sender = parse_chat_id(&chat_id)?;
    let handle = UserHandle::for_external_chat(sender);
    if let Some(user) = run_async(world.identity.find_user_by_handle(&handle))? {
        return Err(eyre::eyre!("unexpected user {} for chat user {chat_id}", user.handle()));
    }
    if run_async(world.identity.find_profile_by_external_id(sender))?.is_some() {
        return Err(eyre::eyre!("unexpected profile for chat user {chat_id}"));
    }
    Ok(())
}
