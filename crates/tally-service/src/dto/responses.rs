//! Response DTOs handed back to the command layer
//!
//! All response DTOs implement `Serialize`. Codes are rendered with their
//! leading `#`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use tally_core::{ChatId, ExternalUserId, GradeId, GradeStatus, GuardianId, MemberId, MessageId};

// ============================================================================
// Member Responses
// ============================================================================

/// Member as shown to admins and guardians
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: MemberId,
    pub display_name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<ExternalUserId>,
    pub active: bool,
}

/// One row of the member directory
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntryResponse {
    pub display_name: String,
    pub code: String,
    pub roster_title: String,
}

// ============================================================================
// Roster Responses
// ============================================================================

/// One row of the roster overview
#[derive(Debug, Clone, Serialize)]
pub struct RosterSummaryResponse {
    pub title: String,
    pub chat_id: ChatId,
    pub member_count: i64,
}

// ============================================================================
// Grading Responses
// ============================================================================

/// A grade with the names it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct GradeResponse {
    pub grade_id: GradeId,
    pub roster_title: String,
    pub member_id: MemberId,
    pub member_name: String,
    pub lesson_date: NaiveDate,
    pub status: GradeStatus,
    pub score: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Delivery counts of one dispatch run
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// One ranked member
#[derive(Debug, Clone, Serialize)]
pub struct StandingResponse {
    pub rank: usize,
    pub member_id: MemberId,
    pub display_name: String,
    pub total_score: i64,
    pub avg_score: f64,
    pub done_count: u32,
    pub not_done_count: u32,
    pub absent_count: u32,
}

/// Leaderboard after synchronization
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub message_id: MessageId,
    /// Whether a new message had to be sent
    pub new_message: bool,
    pub pinned: bool,
    pub standings: Vec<StandingResponse>,
}

/// Everything a grading action produced
#[derive(Debug, Clone, Serialize)]
pub struct GradeOutcomeResponse {
    pub grade: GradeResponse,
    pub notifications: DispatchResponse,
    pub leaderboard: LeaderboardResponse,
}

// ============================================================================
// Guardian Responses
// ============================================================================

/// Registered guardian
#[derive(Debug, Clone, Serialize)]
pub struct GuardianResponse {
    pub id: GuardianId,
    pub external_id: ExternalUserId,
    pub display_name: String,
    pub contact: String,
}

/// Result of linking a guardian to a member
#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub member: MemberResponse,
    pub newly_linked: bool,
    pub backfill: DispatchResponse,
}
