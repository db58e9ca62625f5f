//! Lesson entity - one grading occasion per roster per calendar date

use chrono::NaiveDate;

use crate::value_objects::{LessonId, RosterId};

/// Lesson entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub roster_id: RosterId,
    pub lesson_date: NaiveDate,
}
