//! Long-polling dispatch loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{CommandRouter, InboundMessage, UpdateSource};
use crate::notify::MessageTransport;
use tracing::{debug, error, info, warn};

/// Default pause after a failed poll.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Pulls updates from an [`UpdateSource`] and answers each command message.
pub struct ChatBot<S, M>
where
    S: UpdateSource,
    M: MessageTransport + 'static,
{
    source: S,
    transport: Arc<M>,
    router: Arc<CommandRouter>,
    retry_delay: Duration,
}

impl<S, M> ChatBot<S, M>
where
    S: UpdateSource,
    M: MessageTransport + 'static,
{
    /// Creates a bot replying through `transport`.
    #[must_use]
    pub fn new(source: S, transport: Arc<M>, router: CommandRouter) -> Self {
        Self {
            source,
            transport,
            router: Arc::new(router),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Overrides the pause after a failed poll.
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Polls until `shutdown` resolves.
    ///
    /// Every message is handled on its own task, so a slow command never
    /// holds up the feed. Handlers still running at shutdown are left to
    /// finish on the runtime.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut offset: Option<i64> = None;
        info!(commands = ?self.router.commands(), "chat bot polling started");

        loop {
            let batch = tokio::select! {
                () = &mut shutdown => break,
                batch = self.source.next_updates(offset) => batch,
            };

            match batch {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(offset.map_or(update.update_id + 1, |current| {
                            current.max(update.update_id + 1)
                        }));
                        if let Some(message) = update.message {
                            self.spawn_dispatch(message);
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, delay = ?self.retry_delay, "polling failed, retrying");
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }
        info!("chat bot polling stopped");
    }

    fn spawn_dispatch(&self, message: InboundMessage) {
        let router = Arc::clone(&self.router);
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            let Some(reply) = router.dispatch(&message).await else {
                return;
            };
            match transport.send_text(&message.conversation, &reply).await {
                Ok(()) => debug!(sender = %message.sender, "reply sent"),
                Err(err) => error!(sender = %message.sender, error = %err, "reply failed"),
            }
        });
    }
}
