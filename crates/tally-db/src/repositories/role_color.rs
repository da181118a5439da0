//! PostgreSQL implementation of RoleColorRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{RepoResult, RoleColorRepository};
use tally_core::{RoleColor, RoleColorMemory, Snowflake};

use super::error::map_db_error;

/// PostgreSQL implementation of RoleColorRepository
#[derive(Clone)]
pub struct PgRoleColorRepository {
    pool: PgPool,
}

impl PgRoleColorRepository {
    /// Create a new PgRoleColorRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleColorRepository for PgRoleColorRepository {
    #[instrument(skip(self, memory), fields(server_id = %memory.server_id, role_id = %memory.role_id))]
    async fn remember_if_absent(&self, memory: &RoleColorMemory) -> RepoResult<bool> {
        // DO NOTHING keeps the first recorded color authoritative: repeated
        // customizations must not overwrite the true original.
        let result = sqlx::query(
            r#"
            INSERT INTO role_colors (server_id, role_id, original_color, recorded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (server_id, role_id) DO NOTHING
            "#,
        )
        .bind(memory.server_id.into_inner())
        .bind(memory.role_id.into_inner())
        .bind(memory.original_color.value() as i32)
        .bind(memory.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn original_color(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<Option<RoleColor>> {
        let color = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT original_color FROM role_colors WHERE server_id = $1 AND role_id = $2
            "#,
        )
        .bind(server_id.into_inner())
        .bind(role_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(color.map(|value| RoleColor::new(value as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRoleColorRepository>();
    }
}
