//! Shared world state for chat bot BDD scenarios.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use tasktrack::{
    app::{InMemoryBackend, Services},
    chat::{CommandRouter, InboundMessage},
    identity::{
        adapters::memory::InMemoryIdentityRepository,
        domain::{ConversationHandle, ExternalChatId},
    },
    notify::{MessageTransport, NotificationDispatcher, TransportError},
    task::{adapters::memory::InMemoryTaskRepository, domain::TaskId},
};

/// Transport that accepts and discards every message.
pub struct SilentTransport;

#[async_trait]
impl MessageTransport for SilentTransport {
    async fn send_text(
        &self,
        _conversation: &ConversationHandle,
        _text: &str,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Services type used by the BDD world.
pub type BotServices = Services<InMemoryBackend<SilentTransport>>;

/// Scenario world for chat bot behaviour tests.
pub struct TaskBotWorld {
    pub services: Arc<BotServices>,
    pub identity: Arc<InMemoryIdentityRepository>,
    pub router: CommandRouter,
    pub last_reply: Option<String>,
    pub last_task: Option<TaskId>,
}

impl TaskBotWorld {
    /// Creates a world over fresh in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let identity = Arc::new(InMemoryIdentityRepository::new());
        let notifier = Arc::new(NotificationDispatcher::new(
            Arc::clone(&identity),
            Arc::new(SilentTransport),
        ));
        let services = Arc::new(Services::new(
            Arc::clone(&identity),
            Arc::new(InMemoryTaskRepository::new()),
            notifier,
            Arc::new(DefaultClock),
        ));
        let router = CommandRouter::standard(&services);
        Self {
            services,
            identity,
            router,
            last_reply: None,
            last_task: None,
        }
    }

    /// Sends `text` as `chat_id` and records the reply.
    pub fn send(&mut self, chat_id: &str, text: &str) -> Result<(), eyre::Report> {
        let sender = parse_chat_id(chat_id)?;
        let message = InboundMessage {
            sender,
            conversation: ConversationHandle::from_chat_id(sender.into_inner()),
            text: text.to_owned(),
        };
        self.last_reply = run_async(self.router.dispatch(&message));
        Ok(())
    }
}

impl Default for TaskBotWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskBotWorld {
    TaskBotWorld::default()
}

/// Parses a chat identifier written in a step.
pub fn parse_chat_id(raw: &str) -> Result<ExternalChatId, eyre::Report> {
    raw.parse::<i64>()
        .map(ExternalChatId::new)
        .map_err(|err| eyre::eyre!("invalid chat id {raw:?} in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
