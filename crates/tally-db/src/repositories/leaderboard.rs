//! PostgreSQL implementation of LeaderboardStateRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::LeaderboardState;
use tally_core::error::DomainError;
use tally_core::traits::{LeaderboardStateRepository, RepoResult};
use tally_core::value_objects::{MessageId, RosterId};

use crate::models::LeaderboardStateModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of LeaderboardStateRepository
#[derive(Clone)]
pub struct PgLeaderboardStateRepository {
    pool: PgPool,
}

impl PgLeaderboardStateRepository {
    /// Create a new PgLeaderboardStateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardStateRepository for PgLeaderboardStateRepository {
    #[instrument(skip(self))]
    async fn find(&self, roster_id: RosterId) -> RepoResult<Option<LeaderboardState>> {
        let result = sqlx::query_as::<_, LeaderboardStateModel>(
            r#"
            SELECT roster_id, message_id, updated_at
            FROM leaderboard_states
            WHERE roster_id = $1
            "#,
        )
        .bind(roster_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(LeaderboardState::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, roster_id: RosterId) -> RepoResult<LeaderboardState> {
        let model = sqlx::query_as::<_, LeaderboardStateModel>(
            r#"
            INSERT INTO leaderboard_states (roster_id)
            VALUES ($1)
            RETURNING roster_id, message_id, updated_at
            "#,
        )
        .bind(roster_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::LeaderboardStateExists))?;

        Ok(LeaderboardState::from(model))
    }

    #[instrument(skip(self))]
    async fn set_message(
        &self,
        roster_id: RosterId,
        message_id: MessageId,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO leaderboard_states (roster_id, message_id, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (roster_id) DO UPDATE
            SET message_id = EXCLUDED.message_id, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(roster_id.into_inner())
        .bind(message_id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
