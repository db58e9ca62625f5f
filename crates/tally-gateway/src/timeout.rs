//! Deadline decorator for any messaging gateway
//!
//! Gateway calls block the unit of work that issued them, so every call is cut
//! off after the configured duration and reported as [`GatewayError::Timeout`].

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use tally_core::{ChatId, GatewayError, MessageId, MessagingGateway, TextFormat};

/// Wraps a gateway and bounds each call by `limit`
#[derive(Debug, Clone)]
pub struct TimeoutGateway<G> {
    inner: G,
    limit: Duration,
}

impl<G> TimeoutGateway<G> {
    pub fn new(inner: G, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>> + Send,
    {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                let ms = u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX);
                warn!(op, timeout_ms = ms, "Gateway call timed out");
                Err(GatewayError::Timeout(ms))
            }
        }
    }
}

#[async_trait]
impl<G: MessagingGateway> MessagingGateway for TimeoutGateway<G> {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageId, GatewayError> {
        self.bounded("send_message", self.inner.send_message(chat_id, text, format))
            .await
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), GatewayError> {
        self.bounded(
            "edit_message",
            self.inner.edit_message(chat_id, message_id, text, format),
        )
        .await
    }

    async fn pin_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), GatewayError> {
        self.bounded("pin_message", self.inner.pin_message(chat_id, message_id))
            .await
    }
}
