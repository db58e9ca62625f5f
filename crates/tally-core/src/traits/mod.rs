//! Port traits implemented by the infrastructure crates

mod gateway;
mod repositories;

pub use gateway::{GatewayError, MessagingGateway, TextFormat};
pub use repositories::{
    GradeRepository, GuardianRepository, LeaderboardStateRepository, LessonRepository,
    MemberRepository, MemberStatsRepository, NotificationRepository, RepoResult,
    RosterRepository,
};
