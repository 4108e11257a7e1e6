//! Best-effort delivery of short text notifications.
//!
//! [`MessageTransport`] is the outbound port implemented by the messaging
//! platform client. [`CommentNotifier`] is the hook the comment service calls
//! after a comment is stored; [`NotificationDispatcher`] implements it by
//! looking up the task owner's conversation and sending one message there.
//! Delivery problems are logged and never reach the caller.

mod dispatcher;
mod ports;

pub use dispatcher::{NotificationDispatcher, render_comment_message};
pub use ports::{CommentNotifier, MessageTransport, TransportError};

#[cfg(test)]
mod tests;
