//! PostgreSQL implementation of RosterRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{Roster, RosterSummary};
use tally_core::error::DomainError;
use tally_core::traits::{RepoResult, RosterRepository};
use tally_core::value_objects::{ChatId, RosterId};

use crate::models::{RosterModel, RosterSummaryModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RosterRepository
#[derive(Clone)]
pub struct PgRosterRepository {
    pool: PgPool,
}

impl PgRosterRepository {
    /// Create a new PgRosterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterRepository for PgRosterRepository {
    #[instrument(skip(self))]
    async fn find_by_chat(&self, chat_id: ChatId) -> RepoResult<Option<Roster>> {
        let result = sqlx::query_as::<_, RosterModel>(
            r#"
            SELECT id, chat_id, title, created_at
            FROM rosters
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Roster::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, chat_id: ChatId, title: Option<&str>) -> RepoResult<Roster> {
        let model = sqlx::query_as::<_, RosterModel>(
            r#"
            INSERT INTO rosters (chat_id, title)
            VALUES ($1, $2)
            RETURNING id, chat_id, title, created_at
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RosterExists(chat_id)))?;

        Ok(Roster::from(model))
    }

    #[instrument(skip(self))]
    async fn update_title(&self, id: RosterId, title: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE rosters SET title = $2 WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(title)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RosterNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn overview(&self) -> RepoResult<Vec<RosterSummary>> {
        let results = sqlx::query_as::<_, RosterSummaryModel>(
            r#"
            SELECT r.chat_id, r.title, COUNT(m.id) AS member_count
            FROM rosters r
            LEFT JOIN members m ON m.roster_id = r.id
            GROUP BY r.id, r.chat_id, r.title
            ORDER BY COALESCE(r.title, ''), r.chat_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RosterSummary::from).collect())
    }
}
