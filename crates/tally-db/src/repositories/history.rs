//! PostgreSQL implementation of HistoryRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{HistoryRepository, RepoResult};
use tally_core::{AggregationHistory, Snowflake};

use crate::models::HistoryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of HistoryRepository
#[derive(Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    /// Create a new PgHistoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    #[instrument(skip(self, history))]
    async fn append(&self, history: &AggregationHistory) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO aggregation_history (server_id, aggregated_at, window_start, window_end, ranked)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(history.server_id.into_inner())
        .bind(history.aggregated_at)
        .bind(history.window.start)
        .bind(history.window.end)
        .bind(Json(&history.ranked))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn latest(&self, server_id: Snowflake) -> RepoResult<Option<AggregationHistory>> {
        let result = sqlx::query_as::<_, HistoryModel>(
            r#"
            SELECT id, server_id, aggregated_at, window_start, window_end, ranked
            FROM aggregation_history
            WHERE server_id = $1
            ORDER BY aggregated_at DESC
            LIMIT 1
            "#,
        )
        .bind(server_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(AggregationHistory::from))
    }

    #[instrument(skip(self))]
    async fn recent(
        &self,
        server_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<AggregationHistory>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_as::<_, HistoryModel>(
            r#"
            SELECT id, server_id, aggregated_at, window_start, window_end, ranked
            FROM aggregation_history
            WHERE server_id = $1
            ORDER BY aggregated_at DESC
            LIMIT $2
            "#,
        )
        .bind(server_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(AggregationHistory::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgHistoryRepository>();
    }
}
