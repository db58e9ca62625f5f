//! Bot API request and response payloads

use serde::{Deserialize, Serialize};
use tally_core::{GatewayError, TextFormat};

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// The part of a sent message we care about
#[derive(Debug, Deserialize)]
pub(crate) struct SentMessage {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditMessageText<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PinChatMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub disable_notification: bool,
}

pub(crate) fn parse_mode(format: TextFormat) -> Option<&'static str> {
    match format {
        TextFormat::Plain => None,
        TextFormat::Html => Some("HTML"),
    }
}

/// Map a rejected Bot API call to a gateway error.
///
/// An edit that would not change the text is reported by Telegram as a 400
/// whose description contains "message is not modified".
pub fn classify_error(status: u16, description: &str) -> GatewayError {
    if description
        .to_lowercase()
        .contains("message is not modified")
    {
        return GatewayError::NotModified;
    }
    match status {
        403 => GatewayError::Forbidden(description.to_string()),
        400..=499 => GatewayError::BadRequest(description.to_string()),
        _ => GatewayError::Network(format!("HTTP {status}: {description}")),
    }
}
