//! Member entity - a participant of a roster who gets graded

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ExternalUserId, MemberCode, MemberId, RosterId};

/// Lifecycle status of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
}

impl MemberStatus {
    /// Storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Parse the storage representation (unknown values read as inactive)
    pub fn from_stored(value: &str) -> Self {
        match value {
            "ACTIVE" => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// Member entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub roster_id: RosterId,
    pub external_id: Option<ExternalUserId>,
    pub handle: Option<String>,
    pub display_name: String,
    pub code: MemberCode,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
}

impl Member {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Fill identity fields that are still unknown; never overwrites a known value.
    /// Returns whether anything changed.
    pub fn backfill_identity(
        &mut self,
        external_id: Option<ExternalUserId>,
        handle: Option<&str>,
    ) -> bool {
        let mut changed = false;
        if self.external_id.is_none() {
            if let Some(id) = external_id {
                self.external_id = Some(id);
                changed = true;
            }
        }
        if self.handle.is_none() {
            if let Some(handle) = handle {
                self.handle = Some(handle.to_string());
                changed = true;
            }
        }
        changed
    }
}

/// Insert payload for a new member; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub roster_id: RosterId,
    pub external_id: Option<ExternalUserId>,
    pub handle: Option<String>,
    pub display_name: String,
    pub code: MemberCode,
}

/// Normalise a platform handle: strip a leading `@` and surrounding whitespace
pub fn clean_handle(handle: Option<&str>) -> Option<String> {
    let handle = handle?.trim();
    let handle = handle.strip_prefix('@').unwrap_or(handle).trim();
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}

/// One row of the admin member directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDirectoryEntry {
    pub display_name: String,
    pub code: MemberCode,
    pub roster_title: Option<String>,
}
