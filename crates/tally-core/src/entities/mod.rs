//! Domain entities - core grading records

mod grade;
mod guardian;
mod leaderboard;
mod lesson;
mod member;
mod notification;
mod roster;
mod stats;

pub use grade::{not_done_delta, Grade, GradeChange, GradeDetails, GradeStatus, GradeTransition};
pub use guardian::{Guardian, GuardianLink};
pub use leaderboard::LeaderboardState;
pub use lesson::Lesson;
pub use member::{clean_handle, Member, MemberDirectoryEntry, MemberStatus, NewMember};
pub use notification::{
    truncate_error, DeliveryOutcome, Notification, NotificationStatus, MAX_ERROR_LEN,
};
pub use roster::{Roster, RosterSummary};
pub use stats::MemberStats;
