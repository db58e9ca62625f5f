//! Roster entity - a grading group bound to one group chat

use chrono::{DateTime, Utc};

use crate::value_objects::{ChatId, RosterId};

/// Roster entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub id: RosterId,
    pub chat_id: ChatId,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Roster {
    /// Title to show in messages, or `fallback` when the chat has none
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => fallback,
        }
    }

    /// Whether `title` should replace the stored one
    pub fn needs_title_refresh(&self, title: Option<&str>) -> bool {
        match title {
            Some(t) if !t.is_empty() => self.title.as_deref() != Some(t),
            _ => false,
        }
    }
}

/// One row of the admin roster overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSummary {
    pub title: Option<String>,
    pub chat_id: ChatId,
    pub member_count: i64,
}
