//! PostgreSQL implementation of GradeRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use tally_core::entities::{Grade, GradeChange, GradeDetails, GradeTransition};
use tally_core::traits::{GradeRepository, RepoResult};
use tally_core::value_objects::{ExternalUserId, GradeId, LessonId, MemberId, RosterId, Score};

use crate::models::{GradeDetailsModel, GradeModel};

use super::error::map_db_error;

/// PostgreSQL implementation of GradeRepository
#[derive(Clone)]
pub struct PgGradeRepository {
    pool: PgPool,
}

impl PgGradeRepository {
    /// Create a new PgGradeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_grades(models: Vec<GradeModel>) -> RepoResult<Vec<Grade>> {
    models.into_iter().map(Grade::try_from).collect()
}

#[async_trait]
impl GradeRepository for PgGradeRepository {
    #[instrument(skip(self))]
    async fn find(&self, lesson_id: LessonId, member_id: MemberId) -> RepoResult<Option<Grade>> {
        let result = sqlx::query_as::<_, GradeModel>(
            r#"
            SELECT id, lesson_id, member_id, status, score, graded_by, updated_at
            FROM grades
            WHERE lesson_id = $1 AND member_id = $2
            "#,
        )
        .bind(lesson_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Grade::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_lesson(&self, lesson_id: LessonId) -> RepoResult<Vec<Grade>> {
        let results = sqlx::query_as::<_, GradeModel>(
            r#"
            SELECT id, lesson_id, member_id, status, score, graded_by, updated_at
            FROM grades
            WHERE lesson_id = $1
            ORDER BY member_id
            "#,
        )
        .bind(lesson_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_grades(results)
    }

    #[instrument(skip(self, member_ids), fields(members = member_ids.len()))]
    async fn insert_pending(&self, lesson_id: LessonId, member_ids: &[MemberId]) -> RepoResult<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = member_ids.iter().map(|id| id.into_inner()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO grades (lesson_id, member_id, status)
            SELECT $1, member_id, 'PENDING'
            FROM UNNEST($2::BIGINT[]) AS t(member_id)
            ON CONFLICT (lesson_id, member_id) DO NOTHING
            "#,
        )
        .bind(lesson_id.into_inner())
        .bind(&ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, change), fields(status = change.status.as_str()))]
    async fn apply_change(
        &self,
        lesson_id: LessonId,
        member_id: MemberId,
        change: &GradeChange,
    ) -> RepoResult<GradeTransition> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO grades (lesson_id, member_id, status)
            VALUES ($1, $2, 'PENDING')
            ON CONFLICT (lesson_id, member_id) DO NOTHING
            "#,
        )
        .bind(lesson_id.into_inner())
        .bind(member_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let current = sqlx::query_as::<_, GradeModel>(
            r#"
            SELECT id, lesson_id, member_id, status, score, graded_by, updated_at
            FROM grades
            WHERE lesson_id = $1 AND member_id = $2
            FOR UPDATE
            "#,
        )
        .bind(lesson_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let mut grade = Grade::try_from(current)?;
        let previous_status = grade.apply(change, Utc::now());

        sqlx::query(
            r#"
            UPDATE grades
            SET status = $2, score = $3, graded_by = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(grade.id.into_inner())
        .bind(grade.status.as_str())
        .bind(grade.score.map(Score::value))
        .bind(grade.graded_by.map(ExternalUserId::into_inner))
        .bind(grade.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let transition = GradeTransition {
            grade,
            previous_status,
        };

        let delta = transition.not_done_delta();
        if delta != 0 {
            sqlx::query(
                r#"
                INSERT INTO member_stats (member_id, not_done_count, updated_at)
                VALUES ($1, GREATEST(0, $2), NOW())
                ON CONFLICT (member_id) DO UPDATE
                SET not_done_count = GREATEST(0, member_stats.not_done_count + $2),
                    updated_at = NOW()
                "#,
            )
            .bind(member_id.into_inner())
            .bind(delta)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(
            grade_id = %transition.grade.id,
            previous = previous_status.as_str(),
            delta,
            "Grade change committed"
        );

        Ok(transition)
    }

    #[instrument(skip(self))]
    async fn find_details(&self, id: GradeId) -> RepoResult<Option<GradeDetails>> {
        let result = sqlx::query_as::<_, GradeDetailsModel>(
            r#"
            SELECT g.id, g.lesson_id, g.member_id, g.status, g.score, g.graded_by, g.updated_at,
                   l.roster_id, l.lesson_date,
                   r.chat_id AS roster_chat_id, r.title AS roster_title,
                   r.created_at AS roster_created_at,
                   m.external_id AS member_external_id, m.handle AS member_handle,
                   m.display_name AS member_display_name, m.code AS member_code,
                   m.status AS member_status, m.created_at AS member_created_at
            FROM grades g
            JOIN lessons l ON l.id = g.lesson_id
            JOIN rosters r ON r.id = l.roster_id
            JOIN members m ON m.id = g.member_id
            WHERE g.id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(GradeDetails::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_roster(&self, roster_id: RosterId) -> RepoResult<Vec<Grade>> {
        let results = sqlx::query_as::<_, GradeModel>(
            r#"
            SELECT g.id, g.lesson_id, g.member_id, g.status, g.score, g.graded_by, g.updated_at
            FROM grades g
            JOIN lessons l ON l.id = g.lesson_id
            WHERE l.roster_id = $1
            ORDER BY l.lesson_date, g.member_id
            "#,
        )
        .bind(roster_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_grades(results)
    }

    #[instrument(skip(self))]
    async fn history_for_member(&self, member_id: MemberId) -> RepoResult<Vec<GradeDetails>> {
        let results = sqlx::query_as::<_, GradeDetailsModel>(
            r#"
            SELECT g.id, g.lesson_id, g.member_id, g.status, g.score, g.graded_by, g.updated_at,
                   l.roster_id, l.lesson_date,
                   r.chat_id AS roster_chat_id, r.title AS roster_title,
                   r.created_at AS roster_created_at,
                   m.external_id AS member_external_id, m.handle AS member_handle,
                   m.display_name AS member_display_name, m.code AS member_code,
                   m.status AS member_status, m.created_at AS member_created_at
            FROM grades g
            JOIN lessons l ON l.id = g.lesson_id
            JOIN rosters r ON r.id = l.roster_id
            JOIN members m ON m.id = g.member_id
            WHERE g.member_id = $1
            ORDER BY l.lesson_date, g.id
            "#,
        )
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(GradeDetails::try_from).collect()
    }
}
