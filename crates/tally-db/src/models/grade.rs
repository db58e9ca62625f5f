//! Grade database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for grades table
#[derive(Debug, Clone, FromRow)]
pub struct GradeModel {
    pub id: i64,
    pub lesson_id: i64,
    pub member_id: i64,
    pub status: String,
    pub score: Option<i32>,
    pub graded_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Grade joined with its lesson, roster and member in one flat row
#[derive(Debug, Clone, FromRow)]
pub struct GradeDetailsModel {
    // grade
    pub id: i64,
    pub lesson_id: i64,
    pub member_id: i64,
    pub status: String,
    pub score: Option<i32>,
    pub graded_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
    // lesson
    pub roster_id: i64,
    pub lesson_date: NaiveDate,
    // roster
    pub roster_chat_id: i64,
    pub roster_title: Option<String>,
    pub roster_created_at: DateTime<Utc>,
    // member
    pub member_external_id: Option<i64>,
    pub member_handle: Option<String>,
    pub member_display_name: String,
    pub member_code: String,
    pub member_status: String,
    pub member_created_at: DateTime<Utc>,
}

impl GradeDetailsModel {
    /// Split off the plain grade columns
    pub fn grade(&self) -> GradeModel {
        GradeModel {
            id: self.id,
            lesson_id: self.lesson_id,
            member_id: self.member_id,
            status: self.status.clone(),
            score: self.score,
            graded_by: self.graded_by,
            updated_at: self.updated_at,
        }
    }
}
