//! Telegram Bot API adapter

mod api;
mod client;

pub use api::classify_error;
pub use client::TelegramGateway;
