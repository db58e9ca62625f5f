//! # tally-db
//!
//! Database layer implementing the tally-core repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use tally_db::repositories::PgMemberRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let members = PgMemberRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgGradeRepository, PgGuardianRepository, PgLeaderboardStateRepository, PgLessonRepository,
    PgMemberRepository, PgMemberStatsRepository, PgNotificationRepository, PgRosterRepository,
};
