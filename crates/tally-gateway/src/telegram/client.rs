//! HTTP client for the Bot API methods the grading engine needs

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

use tally_common::TelegramConfig;
use tally_core::{ChatId, GatewayError, MessageId, MessagingGateway, TextFormat};

use super::api::{
    classify_error, parse_mode, ApiResponse, EditMessageText, PinChatMessage, SendMessage,
    SentMessage,
};

/// Telegram Bot API gateway
#[derive(Clone)]
pub struct TelegramGateway {
    client: Client,
    /// `<api_base>/bot<token>`
    endpoint: String,
    timeout: Duration,
}

impl fmt::Debug for TelegramGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramGateway")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TelegramGateway {
    /// Create a gateway from configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &TelegramConfig) -> Result<Self, GatewayError> {
        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.without_url().to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", config.api_base, config.bot_token),
            timeout,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            let ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            return GatewayError::Timeout(ms);
        }
        // Request URLs carry the bot token
        GatewayError::Network(e.without_url().to_string())
    }

    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T, GatewayError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        if body.ok {
            return body
                .result
                .ok_or_else(|| GatewayError::Network(format!("{method}: response without result")));
        }

        let description = body.description.unwrap_or_default();
        debug!(method, status, %description, "Bot API rejected call");
        Err(classify_error(status, &description))
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    #[instrument(skip(self, text), fields(chat_id = %chat_id, len = text.len()))]
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageId, GatewayError> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id: chat_id.into_inner(),
                    text,
                    parse_mode: parse_mode(format),
                    disable_web_page_preview: true,
                },
            )
            .await?;

        Ok(MessageId::new(sent.message_id))
    }

    #[instrument(skip(self, text), fields(chat_id = %chat_id, message_id = %message_id))]
    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), GatewayError> {
        // Answers with the edited message or `true`
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageText {
                    chat_id: chat_id.into_inner(),
                    message_id: message_id.into_inner(),
                    text,
                    parse_mode: parse_mode(format),
                    disable_web_page_preview: true,
                },
            )
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn pin_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), GatewayError> {
        let _: bool = self
            .call(
                "pinChatMessage",
                &PinChatMessage {
                    chat_id: chat_id.into_inner(),
                    message_id: message_id.into_inner(),
                    disable_notification: true,
                },
            )
            .await?;

        Ok(())
    }
}
