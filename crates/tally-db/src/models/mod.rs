//! Database models with SQLx `FromRow` derives and entity mappers

mod activity;
mod auth;
mod history;
mod role_config;
mod streak;

pub use activity::{ActivityCounterModel, UserCountRow};
pub use auth::ServerAuthorizationModel;
pub use history::HistoryModel;
pub use role_config::{RoleColorModel, RoleConfigModel};
pub use streak::StreakModel;
