//! Typed identifiers
//!
//! Row identifiers are assigned by the store; external identifiers come from the
//! chat platform. Wrapping them keeps a `MemberId` from being passed where a
//! `GuardianId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw value
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Roster (grading group) row id
    RosterId
);
define_id!(
    /// Member row id
    MemberId
);
define_id!(
    /// Lesson row id
    LessonId
);
define_id!(
    /// Grade row id
    GradeId
);
define_id!(
    /// Guardian row id
    GuardianId
);
define_id!(
    /// Notification row id
    NotificationId
);
define_id!(
    /// Chat identity on the messaging platform (group chat or private chat)
    ChatId
);
define_id!(
    /// Identity of a platform user
    ExternalUserId
);
define_id!(
    /// Message identifier returned by the messaging gateway
    MessageId
);

impl From<ExternalUserId> for ChatId {
    /// Private chats share the user's identity
    fn from(user: ExternalUserId) -> Self {
        Self(user.0)
    }
}
