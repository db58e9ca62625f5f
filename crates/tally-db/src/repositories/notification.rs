//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{DeliveryOutcome, Notification};
use tally_core::error::DomainError;
use tally_core::traits::{NotificationRepository, RepoResult};
use tally_core::value_objects::{GradeId, GuardianId, NotificationId};

use crate::models::NotificationModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        grade_id: GradeId,
        guardian_id: GuardianId,
    ) -> RepoResult<Option<Notification>> {
        let result = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, grade_id, guardian_id, status, sent_at, error
            FROM notifications
            WHERE grade_id = $1 AND guardian_id = $2
            "#,
        )
        .bind(grade_id.into_inner())
        .bind(guardian_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Notification::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, grade_id: GradeId, guardian_id: GuardianId) -> RepoResult<Notification> {
        let model = sqlx::query_as::<_, NotificationModel>(
            r#"
            INSERT INTO notifications (grade_id, guardian_id, status)
            VALUES ($1, $2, 'PENDING')
            RETURNING id, grade_id, guardian_id, status, sent_at, error
            "#,
        )
        .bind(grade_id.into_inner())
        .bind(guardian_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::NotificationExists))?;

        Ok(Notification::from(model))
    }

    #[instrument(skip(self, outcome), fields(status = outcome.status().as_str()))]
    async fn record(&self, id: NotificationId, outcome: &DeliveryOutcome) -> RepoResult<()> {
        let query = match outcome {
            DeliveryOutcome::Sent { at } => sqlx::query(
                r#"
                UPDATE notifications SET status = 'SENT', sent_at = $2, error = NULL
                WHERE id = $1
                "#,
            )
            .bind(id.into_inner())
            .bind(*at),
            DeliveryOutcome::Failed { error } => sqlx::query(
                r#"
                UPDATE notifications SET status = 'FAILED', error = $2
                WHERE id = $1
                "#,
            )
            .bind(id.into_inner())
            .bind(error.as_str()),
        };

        let result = query.execute(&self.pool).await.map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::DatabaseError(format!(
                "Notification not found: {id}"
            )));
        }

        Ok(())
    }
}
