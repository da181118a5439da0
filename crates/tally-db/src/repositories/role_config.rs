//! PostgreSQL implementation of RoleConfigRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{RepoResult, RoleConfigRepository};
use tally_core::{RoleConfig, Snowflake};

use crate::models::RoleConfigModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoleConfigRepository
#[derive(Clone)]
pub struct PgRoleConfigRepository {
    pool: PgPool,
}

impl PgRoleConfigRepository {
    /// Create a new PgRoleConfigRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleConfigRepository for PgRoleConfigRepository {
    #[instrument(skip(self))]
    async fn get(&self, server_id: Snowflake) -> RepoResult<Option<RoleConfig>> {
        let result = sqlx::query_as::<_, RoleConfigModel>(
            r#"
            SELECT server_id, first_role_id, other_role_id, updated_at
            FROM role_configs
            WHERE server_id = $1
            "#,
        )
        .bind(server_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RoleConfig::from))
    }

    #[instrument(skip(self))]
    async fn set(&self, config: &RoleConfig) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_configs (server_id, first_role_id, other_role_id, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (server_id) DO UPDATE
            SET first_role_id = EXCLUDED.first_role_id,
                other_role_id = EXCLUDED.other_role_id,
                updated_at = NOW()
            "#,
        )
        .bind(config.server_id.into_inner())
        .bind(config.first_role_id.into_inner())
        .bind(config.other_role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRoleConfigRepository>();
    }
}
