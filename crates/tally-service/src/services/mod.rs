//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod activity;
pub mod aggregation;
pub mod auth;
pub mod context;
pub mod error;
pub mod fortune;
pub mod gif;
pub mod leaderboard;
pub mod level;
pub mod registry;
pub mod streak;

// Re-export all services for convenience
pub use activity::ActivityService;
pub use aggregation::{AggregationOutcome, AggregationService, CountSource, TOP_N};
pub use auth::AuthService;
pub use context::{
    AggregationLocks, AuthCache, RegistryCache, ServiceContext, ServiceContextBuilder,
};
pub use error::{ServiceError, ServiceResult};
pub use fortune::{FortuneDraw, FortuneGrade, FortuneService};
pub use gif::GifService;
pub use leaderboard::LeaderboardService;
pub use level::LevelService;
pub use registry::RegistryService;
pub use streak::StreakService;
