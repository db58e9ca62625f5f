//! Leaderboard state - the pinned ranking message displayed for a roster

use chrono::{DateTime, Utc};

use crate::value_objects::{MessageId, RosterId};

/// One row per roster, created lazily on the first synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardState {
    pub roster_id: RosterId,
    pub message_id: Option<MessageId>,
    pub updated_at: DateTime<Utc>,
}

impl LeaderboardState {
    pub fn new(roster_id: RosterId) -> Self {
        Self {
            roster_id,
            message_id: None,
            updated_at: Utc::now(),
        }
    }
}
