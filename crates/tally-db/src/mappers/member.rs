//! Member model mappers

use tally_core::entities::{Member, MemberDirectoryEntry, MemberStats, MemberStatus};
use tally_core::value_objects::{ExternalUserId, MemberCode, MemberId, RosterId};

use crate::models::{MemberDirectoryModel, MemberModel, MemberStatsModel};

impl From<MemberModel> for Member {
    fn from(model: MemberModel) -> Self {
        Member {
            id: MemberId::new(model.id),
            roster_id: RosterId::new(model.roster_id),
            external_id: model.external_id.map(ExternalUserId::new),
            handle: model.handle,
            display_name: model.display_name,
            code: MemberCode::from_stored(model.code),
            status: MemberStatus::from_stored(&model.status),
            created_at: model.created_at,
        }
    }
}

impl From<MemberStatsModel> for MemberStats {
    fn from(model: MemberStatsModel) -> Self {
        MemberStats {
            member_id: MemberId::new(model.member_id),
            not_done_count: model.not_done_count,
            updated_at: model.updated_at,
        }
    }
}

impl From<MemberDirectoryModel> for MemberDirectoryEntry {
    fn from(model: MemberDirectoryModel) -> Self {
        MemberDirectoryEntry {
            display_name: model.display_name,
            code: MemberCode::from_stored(model.code),
            roster_title: model.roster_title,
        }
    }
}
