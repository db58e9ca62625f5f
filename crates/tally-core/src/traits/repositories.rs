//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every uniqueness constraint is enforced by the
//! store and reported as the matching `DomainError` conflict variant.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    DeliveryOutcome, Grade, GradeChange, GradeDetails, GradeTransition, Guardian,
    LeaderboardState, Lesson, Member, MemberDirectoryEntry, MemberStats, NewMember, Notification,
    Roster, RosterSummary,
};
use crate::error::DomainError;
use crate::value_objects::{
    ChatId, ExternalUserId, GradeId, GuardianId, LessonId, MemberCode, MemberId, MessageId,
    NotificationId, RosterId,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Roster Repository
// ============================================================================

#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Find roster by its group chat
    async fn find_by_chat(&self, chat_id: ChatId) -> RepoResult<Option<Roster>>;

    /// Create a roster (`RosterExists` if the chat already has one)
    async fn create(&self, chat_id: ChatId, title: Option<&str>) -> RepoResult<Roster>;

    /// Replace the stored title
    async fn update_title(&self, id: RosterId, title: &str) -> RepoResult<()>;

    /// All rosters with their member counts, ordered by title then chat
    async fn overview(&self) -> RepoResult<Vec<RosterSummary>>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;

    /// Find member by code (codes are unique across all rosters)
    async fn find_by_code(&self, code: &MemberCode) -> RepoResult<Option<Member>>;

    /// Find a roster member by platform identity
    async fn find_by_external_id(
        &self,
        roster_id: RosterId,
        external_id: ExternalUserId,
    ) -> RepoResult<Option<Member>>;

    /// Find a roster member by handle
    async fn find_by_handle(&self, roster_id: RosterId, handle: &str)
        -> RepoResult<Option<Member>>;

    /// Check if a code is already assigned
    async fn code_exists(&self, code: &MemberCode) -> RepoResult<bool>;

    /// Insert a member (`MemberCodeExists` on code collision)
    async fn create(&self, member: &NewMember) -> RepoResult<Member>;

    /// Update name, identity and status; the code never changes
    async fn update(&self, member: &Member) -> RepoResult<()>;

    /// Active members of a roster, ordered by ID
    async fn find_active_by_roster(&self, roster_id: RosterId) -> RepoResult<Vec<Member>>;

    /// Every member with its roster title, ordered by roster title then name
    async fn directory(&self) -> RepoResult<Vec<MemberDirectoryEntry>>;
}

// ============================================================================
// Member Stats Repository
// ============================================================================

#[async_trait]
pub trait MemberStatsRepository: Send + Sync {
    /// Create the stats row with a zero count if it does not exist yet
    async fn ensure(&self, member_id: MemberId) -> RepoResult<MemberStats>;
}

// ============================================================================
// Lesson Repository
// ============================================================================

#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Find the lesson of a roster on a date
    async fn find(&self, roster_id: RosterId, date: NaiveDate) -> RepoResult<Option<Lesson>>;

    /// Create a lesson (`LessonExists` if the roster already has one on that date)
    async fn create(&self, roster_id: RosterId, date: NaiveDate) -> RepoResult<Lesson>;
}

// ============================================================================
// Grade Repository
// ============================================================================

#[async_trait]
pub trait GradeRepository: Send + Sync {
    /// Find the grade of a member for a lesson
    async fn find(&self, lesson_id: LessonId, member_id: MemberId) -> RepoResult<Option<Grade>>;

    /// All grades recorded for a lesson
    async fn find_by_lesson(&self, lesson_id: LessonId) -> RepoResult<Vec<Grade>>;

    /// Insert PENDING rows for members that have none; existing rows are left untouched.
    /// Returns the number of rows inserted.
    async fn insert_pending(&self, lesson_id: LessonId, member_ids: &[MemberId]) -> RepoResult<u64>;

    /// Create the row if missing, overwrite it with `change` and apply the
    /// not-done counter delta to the member's stats, all in one transaction.
    async fn apply_change(
        &self,
        lesson_id: LessonId,
        member_id: MemberId,
        change: &GradeChange,
    ) -> RepoResult<GradeTransition>;

    /// Grade joined with its lesson, roster and member
    async fn find_details(&self, id: GradeId) -> RepoResult<Option<GradeDetails>>;

    /// Every grade of every lesson of a roster
    async fn find_by_roster(&self, roster_id: RosterId) -> RepoResult<Vec<Grade>>;

    /// A member's grades joined with their lessons, oldest lesson first
    async fn history_for_member(&self, member_id: MemberId) -> RepoResult<Vec<GradeDetails>>;
}

// ============================================================================
// Guardian Repository
// ============================================================================

#[async_trait]
pub trait GuardianRepository: Send + Sync {
    /// Find guardian by platform identity
    async fn find_by_external_id(&self, external_id: ExternalUserId)
        -> RepoResult<Option<Guardian>>;

    /// Register a guardian (`GuardianExists` on duplicate identity)
    async fn create(
        &self,
        external_id: ExternalUserId,
        display_name: &str,
        contact: &str,
    ) -> RepoResult<Guardian>;

    /// Update name and contact
    async fn update(&self, guardian: &Guardian) -> RepoResult<()>;

    /// Link a guardian to a member. Returns `false` if the link already existed.
    async fn link(&self, guardian_id: GuardianId, member_id: MemberId) -> RepoResult<bool>;

    /// Guardians linked to a member
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Guardian>>;

    /// Members a guardian is linked to
    async fn members_of(&self, guardian_id: GuardianId) -> RepoResult<Vec<Member>>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find the notification of a (grade, guardian) pair
    async fn find(&self, grade_id: GradeId, guardian_id: GuardianId)
        -> RepoResult<Option<Notification>>;

    /// Create a PENDING notification (`NotificationExists` if the pair already has one)
    async fn create(&self, grade_id: GradeId, guardian_id: GuardianId) -> RepoResult<Notification>;

    /// Overwrite the row with the outcome of the latest attempt
    async fn record(&self, id: NotificationId, outcome: &DeliveryOutcome) -> RepoResult<()>;
}

// ============================================================================
// Leaderboard State Repository
// ============================================================================

#[async_trait]
pub trait LeaderboardStateRepository: Send + Sync {
    /// Find the state of a roster
    async fn find(&self, roster_id: RosterId) -> RepoResult<Option<LeaderboardState>>;

    /// Create an empty state (`LeaderboardStateExists` if present)
    async fn create(&self, roster_id: RosterId) -> RepoResult<LeaderboardState>;

    /// Store the identifier of the currently displayed message
    async fn set_message(
        &self,
        roster_id: RosterId,
        message_id: MessageId,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;
}
