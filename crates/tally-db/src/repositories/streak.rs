//! PostgreSQL implementation of StreakRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{RepoResult, StreakRepository};
use tally_core::{Snowflake, StreakRecord, Tier};

use crate::models::StreakModel;

use super::error::map_db_error;

/// PostgreSQL implementation of StreakRepository
#[derive(Clone)]
pub struct PgStreakRepository {
    pool: PgPool,
}

impl PgStreakRepository {
    /// Create a new PgStreakRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreakRepository for PgStreakRepository {
    #[instrument(skip(self))]
    async fn get(&self, server_id: Snowflake, user_id: Snowflake) -> RepoResult<StreakRecord> {
        let result = sqlx::query_as::<_, StreakModel>(
            r#"
            SELECT server_id, user_id, tier, consecutive_count
            FROM role_streaks
            WHERE server_id = $1 AND user_id = $2
            "#,
        )
        .bind(server_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result
            .map(StreakRecord::from)
            .unwrap_or_else(|| StreakRecord::absent(server_id, user_id)))
    }

    #[instrument(skip(self))]
    async fn advance(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        tier: Tier,
    ) -> RepoResult<i32> {
        // Single-statement streak-or-reset keeps the read-modify-write atomic.
        let new_count = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO role_streaks (server_id, user_id, tier, consecutive_count, updated_at)
            VALUES ($1, $2, $3, 1, NOW())
            ON CONFLICT (server_id, user_id) DO UPDATE
            SET consecutive_count = CASE
                    WHEN role_streaks.tier = EXCLUDED.tier
                    THEN role_streaks.consecutive_count + 1
                    ELSE 1
                END,
                tier = EXCLUDED.tier,
                updated_at = NOW()
            RETURNING consecutive_count
            "#,
        )
        .bind(server_id.into_inner())
        .bind(user_id.into_inner())
        .bind(tier.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(new_count)
    }

    #[instrument(skip(self))]
    async fn reset_to_zero(&self, server_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        // The tier column is deliberately left untouched; see DESIGN.md on
        // the reset quirk.
        sqlx::query(
            r#"
            UPDATE role_streaks
            SET consecutive_count = 0, updated_at = NOW()
            WHERE server_id = $1 AND user_id = $2
            "#,
        )
        .bind(server_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_all(&self, server_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE role_streaks
            SET consecutive_count = 0, updated_at = NOW()
            WHERE server_id = $1
            "#,
        )
        .bind(server_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
