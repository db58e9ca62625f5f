//! Member statistics maintained incrementally on every grade transition

use chrono::{DateTime, Utc};

use crate::value_objects::MemberId;

/// Running statistics for one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStats {
    pub member_id: MemberId,
    /// Number of the member's grades currently in NOT_DONE
    pub not_done_count: i32,
    pub updated_at: DateTime<Utc>,
}

impl MemberStats {
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            not_done_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Apply a counter delta, never going below zero
    pub fn apply_delta(&mut self, delta: i32, now: DateTime<Utc>) {
        if delta == 0 {
            return;
        }
        self.not_done_count = (self.not_done_count + delta).max(0);
        self.updated_at = now;
    }
}
