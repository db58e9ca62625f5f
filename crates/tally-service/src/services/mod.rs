//! Service implementations
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! call.

mod code;
mod context;
mod error;
mod grading;
mod guardian;
mod leaderboard;
mod notification;
mod roster;

pub use code::allocate_code;
pub use context::{GradingSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use grading::{GradeLedger, GradeOutcome};
pub use guardian::{GuardianService, LinkOutcome};
pub use leaderboard::{
    escape_html, next_action, rank, render, EditResult, LeaderboardSynchronizer, Standing,
    SyncAction, SyncEvent, SyncOutcome, SyncReport,
};
pub use notification::{
    format_grade_message, DispatchMode, DispatchReport, NotificationDispatcher,
};
pub use roster::RosterService;
