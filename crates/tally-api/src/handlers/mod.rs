//! HTTP handlers, one module per command group

pub mod aggregation;
pub mod auth;
pub mod events;
pub mod exclusions;
pub mod fortune;
pub mod gifs;
pub mod health;
pub mod leaderboard;
pub mod level;
pub mod role_color;
pub mod role_config;
pub mod streaks;
