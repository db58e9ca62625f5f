//! Database models - SQLx-compatible structs for PostgreSQL tables

mod grade;
mod guardian;
mod leaderboard;
mod lesson;
mod member;
mod notification;
mod roster;

pub use grade::{GradeDetailsModel, GradeModel};
pub use guardian::GuardianModel;
pub use leaderboard::LeaderboardStateModel;
pub use lesson::LessonModel;
pub use member::{MemberDirectoryModel, MemberModel, MemberStatsModel};
pub use notification::NotificationModel;
pub use roster::{RosterModel, RosterSummaryModel};
