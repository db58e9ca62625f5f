//! PostgreSQL implementation of GuardianRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{Guardian, Member};
use tally_core::error::DomainError;
use tally_core::traits::{GuardianRepository, RepoResult};
use tally_core::value_objects::{ExternalUserId, GuardianId, MemberId};

use crate::models::{GuardianModel, MemberModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of GuardianRepository
#[derive(Clone)]
pub struct PgGuardianRepository {
    pool: PgPool,
}

impl PgGuardianRepository {
    /// Create a new PgGuardianRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuardianRepository for PgGuardianRepository {
    #[instrument(skip(self))]
    async fn find_by_external_id(
        &self,
        external_id: ExternalUserId,
    ) -> RepoResult<Option<Guardian>> {
        let result = sqlx::query_as::<_, GuardianModel>(
            r#"
            SELECT id, external_id, display_name, contact, created_at
            FROM guardians
            WHERE external_id = $1
            "#,
        )
        .bind(external_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Guardian::from))
    }

    #[instrument(skip(self, contact))]
    async fn create(
        &self,
        external_id: ExternalUserId,
        display_name: &str,
        contact: &str,
    ) -> RepoResult<Guardian> {
        let model = sqlx::query_as::<_, GuardianModel>(
            r#"
            INSERT INTO guardians (external_id, display_name, contact)
            VALUES ($1, $2, $3)
            RETURNING id, external_id, display_name, contact, created_at
            "#,
        )
        .bind(external_id.into_inner())
        .bind(display_name)
        .bind(contact)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::GuardianExists))?;

        Ok(Guardian::from(model))
    }

    #[instrument(skip(self, guardian), fields(guardian_id = %guardian.id))]
    async fn update(&self, guardian: &Guardian) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE guardians SET display_name = $2, contact = $3 WHERE id = $1
            "#,
        )
        .bind(guardian.id.into_inner())
        .bind(&guardian.display_name)
        .bind(&guardian.contact)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GuardianNotFound(guardian.external_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn link(&self, guardian_id: GuardianId, member_id: MemberId) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO guardian_links (guardian_id, member_id)
            VALUES ($1, $2)
            ON CONFLICT (guardian_id, member_id) DO NOTHING
            "#,
        )
        .bind(guardian_id.into_inner())
        .bind(member_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Guardian>> {
        let results = sqlx::query_as::<_, GuardianModel>(
            r#"
            SELECT g.id, g.external_id, g.display_name, g.contact, g.created_at
            FROM guardians g
            JOIN guardian_links gl ON gl.guardian_id = g.id
            WHERE gl.member_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Guardian::from).collect())
    }

    #[instrument(skip(self))]
    async fn members_of(&self, guardian_id: GuardianId) -> RepoResult<Vec<Member>> {
        let results = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT m.id, m.roster_id, m.external_id, m.handle, m.display_name, m.code,
                   m.status, m.created_at
            FROM members m
            JOIN guardian_links gl ON gl.member_id = m.id
            WHERE gl.guardian_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(guardian_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Member::from).collect())
    }
}
