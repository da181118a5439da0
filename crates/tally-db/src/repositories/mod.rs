//! PostgreSQL repository implementations

mod activity;
mod auth;
mod error;
mod exclusion;
mod history;
mod role_color;
mod role_config;
mod streak;

pub use activity::PgActivityRepository;
pub use auth::PgAuthRepository;
pub use exclusion::PgExclusionRepository;
pub use history::PgHistoryRepository;
pub use role_color::PgRoleColorRepository;
pub use role_config::PgRoleConfigRepository;
pub use streak::PgStreakRepository;
