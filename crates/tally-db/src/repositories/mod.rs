//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in tally-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod grade;
mod guardian;
mod leaderboard;
mod lesson;
mod member;
mod notification;
mod roster;
mod stats;

pub use grade::PgGradeRepository;
pub use guardian::PgGuardianRepository;
pub use leaderboard::PgLeaderboardStateRepository;
pub use lesson::PgLessonRepository;
pub use member::PgMemberRepository;
pub use notification::PgNotificationRepository;
pub use roster::PgRosterRepository;
pub use stats::PgMemberStatsRepository;
