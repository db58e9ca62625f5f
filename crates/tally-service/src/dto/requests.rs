//! Request DTOs handed in by the command layer
//!
//! Requests with free-text fields implement `Validate`; services validate
//! them before touching storage.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use tally_core::{ChatId, ExternalUserId, GradeStatus, MemberId};

/// Who is performing an action, as established by the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub struct Actor {
    pub user_id: Option<ExternalUserId>,
    /// Whether the actor may grade
    pub privileged: bool,
}

impl Actor {
    pub fn privileged(user_id: ExternalUserId) -> Self {
        Self {
            user_id: Some(user_id),
            privileged: true,
        }
    }

    pub fn unprivileged(user_id: ExternalUserId) -> Self {
        Self {
            user_id: Some(user_id),
            privileged: false,
        }
    }
}

// ============================================================================
// Grading Requests
// ============================================================================

/// Grade one member for a lesson
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeMemberRequest {
    pub chat_id: ChatId,
    /// Current chat title, refreshes the stored roster title
    #[validate(length(max = 255, message = "Chat title must be at most 255 characters"))]
    pub chat_title: Option<String>,
    pub member_id: MemberId,
    pub status: GradeStatus,
    /// Checked against the status by the ledger; dropped unless DONE
    pub score: Option<i32>,
    /// Defaults to today in the configured timezone
    pub lesson_date: Option<NaiveDate>,
    pub actor: Actor,
}

// ============================================================================
// Roster Requests
// ============================================================================

/// Admit a chat participant to a roster
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdmitMemberRequest {
    pub external_id: Option<ExternalUserId>,
    pub handle: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Display name must be 1-128 characters"))]
    pub display_name: String,
}

// ============================================================================
// Guardian Requests
// ============================================================================

/// Register (or update) a guardian
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterGuardianRequest {
    pub external_id: ExternalUserId,
    #[validate(length(min = 3, max = 128, message = "Name must be at least 3 characters"))]
    pub display_name: String,
    #[validate(length(min = 5, max = 64, message = "Contact must be at least 5 characters"))]
    pub contact: String,
}

impl RegisterGuardianRequest {
    /// Trim surrounding whitespace before validation
    pub fn normalized(self) -> Self {
        Self {
            external_id: self.external_id,
            display_name: self.display_name.trim().to_string(),
            contact: self.contact.trim().to_string(),
        }
    }
}
