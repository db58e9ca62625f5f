//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ChatId, ExternalUserId, GradeId, LessonId, MemberId, RosterId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Roster not found: {0}")]
    RosterNotFound(RosterId),

    #[error("No roster for chat: {0}")]
    RosterChatNotFound(ChatId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("No member with code #{0}")]
    MemberCodeNotFound(String),

    #[error("Member {member} does not belong to roster {roster}")]
    MemberNotInRoster { member: MemberId, roster: RosterId },

    #[error("Lesson not found: {0}")]
    LessonNotFound(LessonId),

    #[error("Grade not found: {0}")]
    GradeNotFound(GradeId),

    #[error("Guardian not registered: {0}")]
    GuardianNotFound(ExternalUserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("A DONE grade requires a score")]
    MissingScore,

    #[error("Score must be between 1 and 5, got {0}")]
    InvalidScore(i32),

    #[error("Invalid member code: {0}")]
    InvalidMemberCode(String),

    #[error("A member needs an external id or a handle")]
    MissingIdentity,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Actor is not privileged to grade")]
    NotPrivileged,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Member code already in use")]
    MemberCodeExists,

    #[error("Roster already exists for chat {0}")]
    RosterExists(ChatId),

    #[error("Lesson already exists for this date")]
    LessonExists,

    #[error("Grade already exists for this lesson and member")]
    GradeExists,

    #[error("Guardian already registered")]
    GuardianExists,

    #[error("Notification already exists for this grade and guardian")]
    NotificationExists,

    #[error("Leaderboard state already exists")]
    LeaderboardStateExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for callers
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::RosterNotFound(_) | Self::RosterChatNotFound(_) => "UNKNOWN_ROSTER",
            Self::MemberNotFound(_) | Self::MemberCodeNotFound(_) => "UNKNOWN_MEMBER",
            Self::MemberNotInRoster { .. } => "MEMBER_NOT_IN_ROSTER",
            Self::LessonNotFound(_) => "UNKNOWN_LESSON",
            Self::GradeNotFound(_) => "UNKNOWN_GRADE",
            Self::GuardianNotFound(_) => "UNKNOWN_GUARDIAN",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingScore => "MISSING_SCORE",
            Self::InvalidScore(_) => "INVALID_SCORE",
            Self::InvalidMemberCode(_) => "INVALID_MEMBER_CODE",
            Self::MissingIdentity => "MISSING_IDENTITY",

            // Authorization
            Self::NotPrivileged => "NOT_PRIVILEGED",

            // Conflict
            Self::MemberCodeExists => "MEMBER_CODE_EXISTS",
            Self::RosterExists(_) => "ROSTER_EXISTS",
            Self::LessonExists => "LESSON_EXISTS",
            Self::GradeExists => "GRADE_EXISTS",
            Self::GuardianExists => "GUARDIAN_EXISTS",
            Self::NotificationExists => "NOTIFICATION_EXISTS",
            Self::LeaderboardStateExists => "LEADERBOARD_STATE_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RosterNotFound(_)
                | Self::RosterChatNotFound(_)
                | Self::MemberNotFound(_)
                | Self::MemberCodeNotFound(_)
                | Self::MemberNotInRoster { .. }
                | Self::LessonNotFound(_)
                | Self::GradeNotFound(_)
                | Self::GuardianNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::MissingScore
                | Self::InvalidScore(_)
                | Self::InvalidMemberCode(_)
                | Self::MissingIdentity
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotPrivileged)
    }

    /// Check if this is a uniqueness conflict surfaced by the store
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::MemberCodeExists
                | Self::RosterExists(_)
                | Self::LessonExists
                | Self::GradeExists
                | Self::GuardianExists
                | Self::NotificationExists
                | Self::LeaderboardStateExists
        )
    }
}
