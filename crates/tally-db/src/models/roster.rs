//! Roster database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for rosters table
#[derive(Debug, Clone, FromRow)]
pub struct RosterModel {
    pub id: i64,
    pub chat_id: i64,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Roster with its member count (admin overview)
#[derive(Debug, Clone, FromRow)]
pub struct RosterSummaryModel {
    pub chat_id: i64,
    pub title: Option<String>,
    pub member_count: i64,
}
