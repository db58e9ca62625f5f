//! Lesson database model

use chrono::NaiveDate;
use sqlx::FromRow;

/// Database model for lessons table
#[derive(Debug, Clone, FromRow)]
pub struct LessonModel {
    pub id: i64,
    pub roster_id: i64,
    pub lesson_date: NaiveDate,
}
