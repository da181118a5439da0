//! Activity database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use tally_core::{ActivityCounter, Snowflake, UserCount};

/// Database model for the activity_counters table
#[derive(Debug, Clone, FromRow)]
pub struct ActivityCounterModel {
    pub server_id: i64,
    pub user_id: i64,
    pub count: i64,
    pub total: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<ActivityCounterModel> for ActivityCounter {
    fn from(model: ActivityCounterModel) -> Self {
        Self {
            server_id: Snowflake::new(model.server_id),
            user_id: Snowflake::new(model.user_id),
            count: model.count,
            total: model.total,
            updated_at: model.updated_at,
        }
    }
}

/// Projection row for count queries (windowed tallies and live snapshots)
#[derive(Debug, Clone, Copy, FromRow)]
pub struct UserCountRow {
    pub user_id: i64,
    pub count: i64,
}

impl From<UserCountRow> for UserCount {
    fn from(row: UserCountRow) -> Self {
        Self {
            user_id: Snowflake::new(row.user_id),
            count: row.count,
        }
    }
}
