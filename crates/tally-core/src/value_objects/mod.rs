//! Value objects - immutable domain primitives

mod ids;
mod member_code;
mod score;

pub use ids::{
    ChatId, ExternalUserId, GradeId, GuardianId, LessonId, MemberId, MessageId, NotificationId,
    RosterId,
};
pub use member_code::{MemberCode, MemberCodeParseError, DEFAULT_CODE_LENGTH, DRAWS_PER_LENGTH};
pub use score::{Score, ScoreOutOfRange};
