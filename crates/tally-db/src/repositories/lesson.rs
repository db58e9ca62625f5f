//! PostgreSQL implementation of LessonRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::entities::Lesson;
use tally_core::error::DomainError;
use tally_core::traits::{LessonRepository, RepoResult};
use tally_core::value_objects::RosterId;

use crate::models::LessonModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of LessonRepository
#[derive(Clone)]
pub struct PgLessonRepository {
    pool: PgPool,
}

impl PgLessonRepository {
    /// Create a new PgLessonRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for PgLessonRepository {
    #[instrument(skip(self))]
    async fn find(&self, roster_id: RosterId, date: NaiveDate) -> RepoResult<Option<Lesson>> {
        let result = sqlx::query_as::<_, LessonModel>(
            r#"
            SELECT id, roster_id, lesson_date
            FROM lessons
            WHERE roster_id = $1 AND lesson_date = $2
            "#,
        )
        .bind(roster_id.into_inner())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Lesson::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, roster_id: RosterId, date: NaiveDate) -> RepoResult<Lesson> {
        let model = sqlx::query_as::<_, LessonModel>(
            r#"
            INSERT INTO lessons (roster_id, lesson_date)
            VALUES ($1, $2)
            RETURNING id, roster_id, lesson_date
            "#,
        )
        .bind(roster_id.into_inner())
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::LessonExists))?;

        Ok(Lesson::from(model))
    }
}
