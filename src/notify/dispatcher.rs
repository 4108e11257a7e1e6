//! Comment notifications sent to the task owner.

use super::{CommentNotifier, MessageTransport};
use crate::identity::domain::User;
use crate::identity::ports::ProfileRepository;
use crate::task::domain::{Comment, Task};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Renders the notification text for a new comment.
#[must_use]
pub fn render_comment_message(task: &Task, author: &User, comment: &Comment) -> String {
    format!(
        "📝 New comment on task: {title}\n\n👤 From: {author}\n💬 {text}",
        title = task.title(),
        author = author.handle(),
        text = comment.text(),
    )
}

/// Notifies task owners about comments through a [`MessageTransport`].
#[derive(Clone)]
pub struct NotificationDispatcher<P, M>
where
    P: ProfileRepository,
    M: MessageTransport,
{
    profiles: Arc<P>,
    transport: Arc<M>,
}

impl<P, M> NotificationDispatcher<P, M>
where
    P: ProfileRepository,
    M: MessageTransport,
{
    /// Creates a dispatcher reading conversation handles from `profiles`.
    #[must_use]
    pub const fn new(profiles: Arc<P>, transport: Arc<M>) -> Self {
        Self {
            profiles,
            transport,
        }
    }
}

#[async_trait]
impl<P, M> CommentNotifier for NotificationDispatcher<P, M>
where
    P: ProfileRepository,
    M: MessageTransport,
{
    async fn comment_created(&self, task: &Task, author: &User, comment: &Comment) {
        let owner = task.owner();
        let profile = match self.profiles.find_profile_for_user(owner).await {
            Ok(profile) => profile,
            Err(err) => {
                error!(
                    %owner,
                    task_id = %task.id(),
                    error = %err,
                    "profile lookup failed, notification dropped"
                );
                return;
            }
        };
        let Some(conversation) = profile.as_ref().and_then(|found| found.conversation()) else {
            warn!(
                %owner,
                task_id = %task.id(),
                "task owner has no conversation handle, notification skipped"
            );
            return;
        };

        let message = render_comment_message(task, author, comment);
        match self.transport.send_text(conversation, &message).await {
            Ok(()) => debug!(%owner, comment_id = %comment.id(), "comment notification sent"),
            Err(err) => {
                error!(
                    %owner,
                    comment_id = %comment.id(),
                    error = %err,
                    "comment notification failed"
                );
            }
        }
    }
}
