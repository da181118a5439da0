//! PostgreSQL implementation of AuthRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{AuthRepository, RepoResult};
use tally_core::{AuthCode, DomainError, ServerAuthorization, Snowflake};

use crate::models::ServerAuthorizationModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of AuthRepository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    /// Create a new PgAuthRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    #[instrument(skip(self, code), fields(created_at = %code.created_at))]
    async fn insert_code(&self, code: &AuthCode) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_codes (code, created_at, used, used_by)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&code.code)
        .bind(code.created_at)
        .bind(code.used)
        .bind(code.used_by.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // A collision on a freshly generated 16-char code is vanishingly
            // unlikely; surface it distinctly rather than as a store outage.
            map_unique_violation(e, || {
                DomainError::InternalError("auth code collision".to_string())
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self, code))]
    async fn redeem(&self, code: &str, server_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock so two servers racing on the same code cannot both pass
        // the used check.
        let used = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT used FROM auth_codes WHERE code = $1 FOR UPDATE
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        match used {
            None => return Err(DomainError::InvalidCode),
            Some(true) => return Err(DomainError::CodeAlreadyUsed),
            Some(false) => {}
        }

        sqlx::query(
            r#"
            UPDATE auth_codes SET used = TRUE, used_by = $2 WHERE code = $1
            "#,
        )
        .bind(code)
        .bind(server_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO authorized_servers (server_id, authorized_at, auth_code_used)
            VALUES ($1, NOW(), $2)
            ON CONFLICT (server_id) DO NOTHING
            "#,
        )
        .bind(server_id.into_inner())
        .bind(code)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_authorized(&self, server_id: Snowflake) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM authorized_servers WHERE server_id = $1)
            "#,
        )
        .bind(server_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn list_authorizations(&self) -> RepoResult<Vec<ServerAuthorization>> {
        let results = sqlx::query_as::<_, ServerAuthorizationModel>(
            r#"
            SELECT server_id, authorized_at, auth_code_used
            FROM authorized_servers
            ORDER BY authorized_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ServerAuthorization::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAuthRepository>();
    }
}
