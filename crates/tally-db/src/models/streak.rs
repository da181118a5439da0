//! Streak database model

use sqlx::FromRow;

use tally_core::{Snowflake, StreakRecord, Tier};

/// Database model for the role_streaks table
#[derive(Debug, Clone, FromRow)]
pub struct StreakModel {
    pub server_id: i64,
    pub user_id: i64,
    pub tier: String,
    pub consecutive_count: i32,
}

impl From<StreakModel> for StreakRecord {
    fn from(model: StreakModel) -> Self {
        Self {
            server_id: Snowflake::new(model.server_id),
            user_id: Snowflake::new(model.user_id),
            tier: Tier::parse(&model.tier),
            consecutive_count: model.consecutive_count,
        }
    }
}
