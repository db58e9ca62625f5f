//! Guardian and notification model mappers

use tally_core::entities::{Guardian, Notification, NotificationStatus};
use tally_core::value_objects::{ExternalUserId, GradeId, GuardianId, NotificationId};

use crate::models::{GuardianModel, NotificationModel};

impl From<GuardianModel> for Guardian {
    fn from(model: GuardianModel) -> Self {
        Guardian {
            id: GuardianId::new(model.id),
            external_id: ExternalUserId::new(model.external_id),
            display_name: model.display_name,
            contact: model.contact,
            created_at: model.created_at,
        }
    }
}

impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: NotificationId::new(model.id),
            grade_id: GradeId::new(model.grade_id),
            guardian_id: GuardianId::new(model.guardian_id),
            status: NotificationStatus::from_stored(&model.status),
            sent_at: model.sent_at,
            error: model.error,
        }
    }
}
