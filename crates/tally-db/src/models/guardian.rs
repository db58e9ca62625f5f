//! Guardian database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for guardians table
#[derive(Debug, Clone, FromRow)]
pub struct GuardianModel {
    pub id: i64,
    pub external_id: i64,
    pub display_name: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}
