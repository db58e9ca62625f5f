//! Guardian entity - a party notified of a member's grading outcomes

use chrono::{DateTime, Utc};

use crate::value_objects::{ExternalUserId, GuardianId, MemberId};

/// Guardian entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guardian {
    pub id: GuardianId,
    pub external_id: ExternalUserId,
    pub display_name: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

/// Link between a guardian and a member they follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardianLink {
    pub guardian_id: GuardianId,
    pub member_id: MemberId,
}
