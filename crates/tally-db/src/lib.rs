//! # tally-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `tally-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::pool::{create_pool, DatabaseConfig};
//! use tally_db::PgActivityRepository;
//! use tally_core::ActivityRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let activity_repo = PgActivityRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgActivityRepository, PgAuthRepository, PgExclusionRepository, PgHistoryRepository,
    PgRoleColorRepository, PgRoleConfigRepository, PgStreakRepository,
};
