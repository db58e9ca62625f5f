//! PostgreSQL implementation of MemberStatsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::MemberStats;
use tally_core::traits::{MemberStatsRepository, RepoResult};
use tally_core::value_objects::MemberId;

use crate::models::MemberStatsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MemberStatsRepository
#[derive(Clone)]
pub struct PgMemberStatsRepository {
    pool: PgPool,
}

impl PgMemberStatsRepository {
    /// Create a new PgMemberStatsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStatsRepository for PgMemberStatsRepository {
    #[instrument(skip(self))]
    async fn ensure(&self, member_id: MemberId) -> RepoResult<MemberStats> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let model = sqlx::query_as::<_, MemberStatsModel>(
            r#"
            INSERT INTO member_stats (member_id, not_done_count)
            VALUES ($1, 0)
            ON CONFLICT (member_id) DO UPDATE SET member_id = EXCLUDED.member_id
            RETURNING member_id, not_done_count, updated_at
            "#,
        )
        .bind(member_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(MemberStats::from(model))
    }
}
