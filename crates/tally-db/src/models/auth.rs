//! Authorization database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use tally_core::{ServerAuthorization, Snowflake};

/// Database model for the authorized_servers table
#[derive(Debug, Clone, FromRow)]
pub struct ServerAuthorizationModel {
    pub server_id: i64,
    pub authorized_at: DateTime<Utc>,
    pub auth_code_used: String,
}

impl From<ServerAuthorizationModel> for ServerAuthorization {
    fn from(model: ServerAuthorizationModel) -> Self {
        Self {
            server_id: Snowflake::new(model.server_id),
            authorized_at: model.authorized_at,
            auth_code_used: model.auth_code_used,
        }
    }
}
