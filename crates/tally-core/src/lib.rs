//! # tally-core
//!
//! Domain layer containing grading entities, value objects, the domain error and
//! the port traits (repositories and messaging gateway).
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    clean_handle, not_done_delta, DeliveryOutcome, Grade, GradeChange, GradeDetails,
    GradeStatus, GradeTransition, Guardian, LeaderboardState, Lesson, Member,
    MemberDirectoryEntry, MemberStats, MemberStatus, NewMember, Notification,
    NotificationStatus, Roster, RosterSummary,
};
pub use error::DomainError;
pub use traits::{
    GatewayError, GradeRepository, GuardianRepository, LeaderboardStateRepository,
    LessonRepository, MemberRepository, MemberStatsRepository, MessagingGateway,
    NotificationRepository, RepoResult, RosterRepository, TextFormat,
};
pub use value_objects::{
    ChatId, ExternalUserId, GradeId, GuardianId, LessonId, MemberCode, MemberId, MessageId,
    NotificationId, RosterId, Score,
};
