//! Messaging gateway port - the chat platform as seen by the domain
//!
//! Every call blocks the current unit of work until the platform answers or the
//! implementation gives up. Callers decide which failures are fatal.

use async_trait::async_trait;
use thiserror::Error;

use crate::value_objects::{ChatId, MessageId};

/// How the platform should interpret message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// Gateway failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An edit carried exactly the text already displayed
    #[error("Message is not modified")]
    NotModified,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway call timed out after {0}ms")]
    Timeout(u64),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "GATEWAY_FORBIDDEN",
            Self::BadRequest(_) => "GATEWAY_BAD_REQUEST",
            Self::NotModified => "GATEWAY_NOT_MODIFIED",
            Self::Network(_) => "GATEWAY_NETWORK_ERROR",
            Self::Timeout(_) => "GATEWAY_TIMEOUT",
        }
    }
}

#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send a message and return the identifier the platform assigned to it
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageId, GatewayError>;

    /// Replace the text of a message
    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), GatewayError>;

    /// Pin a message silently
    async fn pin_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), GatewayError>;
}
