//! Wiring of the production service context
//!
//! Connects to PostgreSQL, applies migrations and puts the Telegram gateway
//! behind the configured request timeout.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use tally_common::AppConfig;
use tally_db::{
    create_pool, run_migrations, DatabaseConfig, PgGradeRepository, PgGuardianRepository,
    PgLeaderboardStateRepository, PgLessonRepository, PgMemberRepository,
    PgMemberStatsRepository, PgNotificationRepository, PgRosterRepository,
};
use tally_gateway::{TelegramGateway, TimeoutGateway};

use crate::services::{GradingSettings, ServiceContext, ServiceContextBuilder};

/// Build a [`ServiceContext`] backed by PostgreSQL and Telegram
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<ServiceContext> {
    let settings =
        GradingSettings::from_config(&config.grading).context("invalid grading settings")?;

    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    info!("Database ready");

    let telegram =
        TelegramGateway::new(&config.telegram).context("failed to build Telegram client")?;
    let gateway = TimeoutGateway::new(telegram, config.telegram.request_timeout());

    let ctx = ServiceContextBuilder::new()
        .roster_repo(Arc::new(PgRosterRepository::new(pool.clone())))
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .stats_repo(Arc::new(PgMemberStatsRepository::new(pool.clone())))
        .lesson_repo(Arc::new(PgLessonRepository::new(pool.clone())))
        .grade_repo(Arc::new(PgGradeRepository::new(pool.clone())))
        .guardian_repo(Arc::new(PgGuardianRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
        .leaderboard_repo(Arc::new(PgLeaderboardStateRepository::new(pool)))
        .gateway(Arc::new(gateway))
        .settings(settings)
        .build()
        .context("incomplete service context")?;

    info!(
        env = ?config.app.env,
        timeout_secs = config.telegram.request_timeout_secs,
        "Service context ready"
    );
    Ok(ctx)
}
