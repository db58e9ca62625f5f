//! Member database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for members table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: i64,
    pub roster_id: i64,
    pub external_id: Option<i64>,
    pub handle: Option<String>,
    pub display_name: String,
    pub code: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for member_stats table
#[derive(Debug, Clone, FromRow)]
pub struct MemberStatsModel {
    pub member_id: i64,
    pub not_done_count: i32,
    pub updated_at: DateTime<Utc>,
}

/// Member joined with its roster title
#[derive(Debug, Clone, FromRow)]
pub struct MemberDirectoryModel {
    pub display_name: String,
    pub code: String,
    pub roster_title: Option<String>,
}
