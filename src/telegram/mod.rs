//! Telegram Bot API client.
//!
//! [`TelegramClient`] implements [`crate::notify::MessageTransport`] with
//! `sendMessage` and [`crate::chat::UpdateSource`] with `getUpdates` long
//! polling. Only the fields this application reads are modelled.

mod client;
mod types;

pub use client::{TelegramClient, TelegramSettings};
pub use types::{ApiResponse, Chat, Message, Sender, Update};

#[cfg(test)]
mod tests;
