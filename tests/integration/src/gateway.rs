//! Scripted messaging gateway
//!
//! Records every call and behaves like the chat platform: edits of unknown
//! messages fail and edits that repeat the displayed text report
//! `NotModified`. Failures can be scripted per recipient or per call.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use tally_core::traits::{GatewayError, MessagingGateway, TextFormat};
use tally_core::{ChatId, MessageId};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send {
        chat_id: ChatId,
        text: String,
        format: TextFormat,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    Pin {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    last_message_id: i64,
    displayed: HashMap<MessageId, String>,
    send_failures: HashMap<ChatId, GatewayError>,
    edit_results: VecDeque<Result<(), GatewayError>>,
    pin_failure: Option<GatewayError>,
}

/// Gateway double with programmable failures
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to `chat_id` fails with `error` until cleared
    pub fn fail_sends_to(&self, chat_id: ChatId, error: GatewayError) {
        self.script.lock().send_failures.insert(chat_id, error);
    }

    /// Sends to `chat_id` succeed again
    pub fn restore_sends_to(&self, chat_id: ChatId) {
        self.script.lock().send_failures.remove(&chat_id);
    }

    /// The next edit answers `result` regardless of the displayed text
    pub fn script_edit(&self, result: Result<(), GatewayError>) {
        self.script.lock().edit_results.push_back(result);
    }

    /// Every pin fails with `error`
    pub fn fail_pins(&self, error: GatewayError) {
        self.script.lock().pin_failure = Some(error);
    }

    /// Forget a message as if it had been deleted in the chat
    pub fn delete_message(&self, message_id: MessageId) {
        self.script.lock().displayed.remove(&message_id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    /// Texts of every send attempt to `chat_id`, failed ones included
    pub fn sends_to(&self, chat_id: ChatId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send { chat_id: c, text, .. } if c == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.count(|call| matches!(call, Call::Send { .. }))
    }

    pub fn edit_count(&self) -> usize {
        self.count(|call| matches!(call, Call::Edit { .. }))
    }

    /// Message ids of every pin attempt
    pub fn pins(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Pin { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    /// Text currently shown by a message
    pub fn displayed(&self, message_id: MessageId) -> Option<String> {
        self.script.lock().displayed.get(&message_id).cloned()
    }

    /// Forget recorded calls, keeping scripted behaviour and displayed messages
    pub fn clear_calls(&self) {
        self.script.lock().calls.clear();
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.script.lock().calls.iter().filter(|c| predicate(c)).count()
    }
}

#[async_trait]
impl MessagingGateway for ScriptedGateway {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageId, GatewayError> {
        let mut script = self.script.lock();
        script.calls.push(Call::Send {
            chat_id,
            text: text.to_string(),
            format,
        });
        if let Some(error) = script.send_failures.get(&chat_id) {
            return Err(error.clone());
        }
        script.last_message_id += 1;
        let id = MessageId::new(script.last_message_id);
        script.displayed.insert(id, text.to_string());
        Ok(id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        _format: TextFormat,
    ) -> Result<(), GatewayError> {
        let mut script = self.script.lock();
        script.calls.push(Call::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        if let Some(result) = script.edit_results.pop_front() {
            return result;
        }
        match script.displayed.get_mut(&message_id) {
            None => Err(GatewayError::BadRequest(
                "message to edit not found".to_string(),
            )),
            Some(shown) if shown.as_str() == text => Err(GatewayError::NotModified),
            Some(shown) => {
                *shown = text.to_string();
                Ok(())
            }
        }
    }

    async fn pin_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), GatewayError> {
        let mut script = self.script.lock();
        script.calls.push(Call::Pin {
            chat_id,
            message_id,
        });
        match &script.pin_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
