//! PostgreSQL implementation of ExclusionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{ExclusionRepository, RepoResult};
use tally_core::Snowflake;

use super::error::map_db_error;

/// PostgreSQL implementation of ExclusionRepository
#[derive(Clone)]
pub struct PgExclusionRepository {
    pool: PgPool,
}

impl PgExclusionRepository {
    /// Create a new PgExclusionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExclusionRepository for PgExclusionRepository {
    #[instrument(skip(self))]
    async fn get(&self, server_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let role_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT role_id FROM excluded_roles WHERE server_id = $1 ORDER BY created_at
            "#,
        )
        .bind(server_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(role_ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn add(&self, server_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO excluded_roles (server_id, role_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (server_id, role_id) DO NOTHING
            "#,
        )
        .bind(server_id.into_inner())
        .bind(role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove(&self, server_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM excluded_roles WHERE server_id = $1 AND role_id = $2
            "#,
        )
        .bind(server_id.into_inner())
        .bind(role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgExclusionRepository>();
    }
}
