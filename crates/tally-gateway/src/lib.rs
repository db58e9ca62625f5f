//! # tally-gateway
//!
//! Implementations of the `MessagingGateway` port:
//!
//! - [`TelegramGateway`] talks to the Telegram Bot API over HTTPS
//! - [`TimeoutGateway`] bounds every call of any gateway by a deadline

pub mod telegram;
pub mod timeout;

pub use telegram::{classify_error, TelegramGateway};
pub use timeout::TimeoutGateway;
