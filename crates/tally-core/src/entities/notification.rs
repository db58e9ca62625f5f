//! Notification entity - the delivery record for one (grade, guardian) pair

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{GradeId, GuardianId, NotificationId};

/// Maximum stored length of a delivery error, in characters
pub const MAX_ERROR_LEN: usize = 255;

/// Delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }

    /// Parse the storage representation (unknown values read as pending)
    pub fn from_stored(value: &str) -> Self {
        match value {
            "SENT" => Self::Sent,
            "FAILED" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Notification entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub grade_id: GradeId,
    pub guardian_id: GuardianId,
    pub status: NotificationStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Outcome of one delivery attempt, written over the notification row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { at: DateTime<Utc> },
    Failed { error: String },
}

impl DeliveryOutcome {
    /// Failed outcome with the error text truncated to [`MAX_ERROR_LEN`] characters
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self::Failed {
            error: truncate_error(&error.to_string()),
        }
    }

    pub fn status(&self) -> NotificationStatus {
        match self {
            Self::Sent { .. } => NotificationStatus::Sent,
            Self::Failed { .. } => NotificationStatus::Failed,
        }
    }
}

impl Notification {
    /// Overwrite the row with the latest attempt. A failure keeps the previous `sent_at`.
    pub fn record(&mut self, outcome: &DeliveryOutcome) {
        self.status = outcome.status();
        match outcome {
            DeliveryOutcome::Sent { at } => {
                self.sent_at = Some(*at);
                self.error = None;
            }
            DeliveryOutcome::Failed { error } => {
                self.error = Some(error.clone());
            }
        }
    }
}

/// Truncate on a character boundary
pub fn truncate_error(error: &str) -> String {
    error.chars().take(MAX_ERROR_LEN).collect()
}
