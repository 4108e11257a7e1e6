//! HTTP client for the Bot API methods this application uses.

use std::fmt;
use std::time::Duration;

use super::types::{ApiResponse, GetUpdatesRequest, SendMessageRequest, Update};
use crate::chat::{InboundUpdate, UpdateSource};
use crate::identity::domain::ConversationHandle;
use crate::notify::{MessageTransport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Extra time allowed on top of the long-poll timeout before the HTTP
/// request itself is abandoned.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Connection settings for [`TelegramClient`].
#[derive(Clone)]
pub struct TelegramSettings {
    /// Bot token issued by `@BotFather`.
    pub token: String,
    /// Bot API base URL without trailing slash.
    pub api_base: String,
    /// Timeout of a single `sendMessage` call.
    pub send_timeout: Duration,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("send_timeout", &self.send_timeout)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

/// Bot API client.
///
/// Transport errors never include the request URL, which embeds the token.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    settings: TelegramSettings,
}

impl TelegramClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the HTTP client cannot be
    /// built.
    pub fn new(settings: TelegramSettings) -> Result<Self, TransportError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| TransportError::Request(err.without_url().to_string()))?;
        Ok(Self { http, settings })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.token
        )
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TransportError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let response = self
            .http
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.without_url().to_string()))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|err| TransportError::Decode(err.without_url().to_string()))?;

        if !envelope.ok {
            let reason = envelope
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            warn!(method, %status, error_code = ?envelope.error_code, "bot API call rejected");
            return Err(TransportError::Rejected(reason));
        }
        envelope
            .result
            .ok_or_else(|| TransportError::Decode(format!("{method} returned no result")))
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageTransport for TelegramClient {
    async fn send_text(
        &self,
        conversation: &ConversationHandle,
        text: &str,
    ) -> Result<(), TransportError> {
        let body = SendMessageRequest {
            chat_id: conversation.as_str(),
            text,
        };
        let _: serde_json::Value = self
            .call("sendMessage", &body, self.settings.send_timeout)
            .await?;
        debug!(conversation = %conversation.as_str(), "message delivered");
        Ok(())
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn next_updates(
        &self,
        offset: Option<i64>,
    ) -> Result<Vec<InboundUpdate>, TransportError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: self.settings.poll_timeout.as_secs(),
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &body,
                self.settings.poll_timeout + POLL_GRACE,
            )
            .await?;
        Ok(updates.into_iter().map(InboundUpdate::from).collect())
    }
}
