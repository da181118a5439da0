//! Role-configuration database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use tally_core::{RoleColor, RoleColorMemory, RoleConfig, Snowflake};

/// Database model for the role_configs table
#[derive(Debug, Clone, FromRow)]
pub struct RoleConfigModel {
    pub server_id: i64,
    pub first_role_id: i64,
    pub other_role_id: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleConfigModel> for RoleConfig {
    fn from(model: RoleConfigModel) -> Self {
        Self {
            server_id: Snowflake::new(model.server_id),
            first_role_id: Snowflake::new(model.first_role_id),
            other_role_id: Snowflake::new(model.other_role_id),
            updated_at: model.updated_at,
        }
    }
}

/// Database model for the role_colors table (remembered original colors)
#[derive(Debug, Clone, FromRow)]
pub struct RoleColorModel {
    pub server_id: i64,
    pub role_id: i64,
    pub original_color: i32,
    pub recorded_at: DateTime<Utc>,
}

impl From<RoleColorModel> for RoleColorMemory {
    fn from(model: RoleColorModel) -> Self {
        Self {
            server_id: Snowflake::new(model.server_id),
            role_id: Snowflake::new(model.role_id),
            original_color: RoleColor::new(model.original_color as u32),
            recorded_at: model.recorded_at,
        }
    }
}
