//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::{Member, MemberDirectoryEntry, NewMember};
use tally_core::error::DomainError;
use tally_core::traits::{MemberRepository, RepoResult};
use tally_core::value_objects::{ExternalUserId, MemberCode, MemberId, RosterId};

use crate::models::{MemberDirectoryModel, MemberModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, roster_id, external_id, handle, display_name, code, status, created_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &MemberCode) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, roster_id, external_id, handle, display_name, code, status, created_at
            FROM members
            WHERE code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn find_by_external_id(
        &self,
        roster_id: RosterId,
        external_id: ExternalUserId,
    ) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, roster_id, external_id, handle, display_name, code, status, created_at
            FROM members
            WHERE roster_id = $1 AND external_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(roster_id.into_inner())
        .bind(external_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn find_by_handle(
        &self,
        roster_id: RosterId,
        handle: &str,
    ) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, roster_id, external_id, handle, display_name, code, status, created_at
            FROM members
            WHERE roster_id = $1 AND handle = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(roster_id.into_inner())
        .bind(handle)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn code_exists(&self, code: &MemberCode) -> RepoResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM members WHERE code = $1)
            "#,
        )
        .bind(code.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists.0)
    }

    #[instrument(skip(self, member), fields(roster_id = %member.roster_id, code = %member.code))]
    async fn create(&self, member: &NewMember) -> RepoResult<Member> {
        let model = sqlx::query_as::<_, MemberModel>(
            r#"
            INSERT INTO members (roster_id, external_id, handle, display_name, code, status)
            VALUES ($1, $2, $3, $4, $5, 'ACTIVE')
            RETURNING id, roster_id, external_id, handle, display_name, code, status, created_at
            "#,
        )
        .bind(member.roster_id.into_inner())
        .bind(member.external_id.map(ExternalUserId::into_inner))
        .bind(&member.handle)
        .bind(&member.display_name)
        .bind(member.code.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::MemberCodeExists))?;

        Ok(Member::from(model))
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn update(&self, member: &Member) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET external_id = $2, handle = $3, display_name = $4, status = $5
            WHERE id = $1
            "#,
        )
        .bind(member.id.into_inner())
        .bind(member.external_id.map(ExternalUserId::into_inner))
        .bind(&member.handle)
        .bind(&member.display_name)
        .bind(member.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(member.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_active_by_roster(&self, roster_id: RosterId) -> RepoResult<Vec<Member>> {
        let results = sqlx::query_as::<_, MemberModel>(
            r#"
            SELECT id, roster_id, external_id, handle, display_name, code, status, created_at
            FROM members
            WHERE roster_id = $1 AND status = 'ACTIVE'
            ORDER BY id
            "#,
        )
        .bind(roster_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn directory(&self) -> RepoResult<Vec<MemberDirectoryEntry>> {
        let results = sqlx::query_as::<_, MemberDirectoryModel>(
            r#"
            SELECT m.display_name, m.code, r.title AS roster_title
            FROM members m
            JOIN rosters r ON r.id = m.roster_id
            ORDER BY COALESCE(r.title, ''), m.display_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MemberDirectoryEntry::from).collect())
    }
}
