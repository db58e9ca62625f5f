//! Leaderboard state database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for leaderboard_states table
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardStateModel {
    pub roster_id: i64,
    pub message_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
