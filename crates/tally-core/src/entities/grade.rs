//! Grade entity - the per-lesson, per-member outcome record
//!
//! A grade row is created as PENDING the first time its lesson is touched and is
//! overwritten in place by every later grading of the same member on the same
//! date. All four statuses are reachable from each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Lesson, Member, Roster};
use crate::error::DomainError;
use crate::value_objects::{ExternalUserId, GradeId, LessonId, MemberId, Score};

/// Grade status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeStatus {
    #[default]
    Pending,
    Done,
    NotDone,
    Absent,
}

impl GradeStatus {
    /// Storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
            Self::NotDone => "NOT_DONE",
            Self::Absent => "ABSENT",
        }
    }

    /// Parse the storage representation
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "DONE" => Ok(Self::Done),
            "NOT_DONE" => Ok(Self::NotDone),
            "ABSENT" => Ok(Self::Absent),
            other => Err(DomainError::ValidationError(format!(
                "unknown grade status: {other}"
            ))),
        }
    }

    /// Human label used in notifications
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Not graded",
            Self::Done => "Done",
            Self::NotDone => "Not done",
            Self::Absent => "Absent",
        }
    }
}

/// Change to the not-done counter caused by moving from `old` to `new`.
///
/// Entering NOT_DONE counts +1, leaving it counts -1, anything else is a no-op.
pub fn not_done_delta(old: GradeStatus, new: GradeStatus) -> i32 {
    match (old == GradeStatus::NotDone, new == GradeStatus::NotDone) {
        (false, true) => 1,
        (true, false) => -1,
        _ => 0,
    }
}

/// Grade entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub id: GradeId,
    pub lesson_id: LessonId,
    pub member_id: MemberId,
    pub status: GradeStatus,
    pub score: Option<Score>,
    pub graded_by: Option<ExternalUserId>,
    pub updated_at: DateTime<Utc>,
}

impl Grade {
    /// Overwrite this grade with `change`, returning the previous status
    pub fn apply(&mut self, change: &GradeChange, now: DateTime<Utc>) -> GradeStatus {
        let previous = self.status;
        self.status = change.status;
        self.score = change.score;
        self.graded_by = change.graded_by;
        self.updated_at = now;
        previous
    }
}

/// A validated grading action.
///
/// DONE carries a score in 1..=5; every other status has its score forced to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeChange {
    pub status: GradeStatus,
    pub score: Option<Score>,
    pub graded_by: Option<ExternalUserId>,
}

impl GradeChange {
    pub fn new(
        status: GradeStatus,
        score: Option<i32>,
        graded_by: Option<ExternalUserId>,
    ) -> Result<Self, DomainError> {
        let score = match status {
            GradeStatus::Done => {
                let raw = score.ok_or(DomainError::MissingScore)?;
                Some(Score::try_from(raw).map_err(|e| DomainError::InvalidScore(e.0))?)
            }
            _ => None,
        };
        Ok(Self {
            status,
            score,
            graded_by,
        })
    }
}

/// Result of applying a [`GradeChange`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeTransition {
    pub grade: Grade,
    pub previous_status: GradeStatus,
}

impl GradeTransition {
    pub fn not_done_delta(&self) -> i32 {
        not_done_delta(self.previous_status, self.grade.status)
    }
}

/// A grade joined with its lesson, roster and member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeDetails {
    pub grade: Grade,
    pub lesson: Lesson,
    pub roster: Roster,
    pub member: Member,
}
