//! PostgreSQL implementation of ActivityRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use tally_core::traits::{ActivityRepository, RepoResult};
use tally_core::{ActivityCounter, AggregationWindow, MessageRecord, Snowflake, UserCount};

use crate::models::{ActivityCounterModel, UserCountRow};

use super::error::map_db_error;

/// PostgreSQL implementation of ActivityRepository
#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    /// Create a new PgActivityRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    #[instrument(skip(self))]
    async fn record_message(&self, record: &MessageRecord) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The log insert doubles as a redelivery guard: the platform delivers
        // at-least-once, and a replayed message_id must not bump the counter
        // a second time.
        let inserted = sqlx::query(
            r#"
            INSERT INTO messages (server_id, user_id, message_id, ts)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (server_id, message_id) DO NOTHING
            "#,
        )
        .bind(record.server_id.into_inner())
        .bind(record.user_id.into_inner())
        .bind(record.message_id.into_inner())
        .bind(record.timestamp)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if inserted > 0 {
            sqlx::query(
                r#"
                INSERT INTO activity_counters (server_id, user_id, count, total, created_at, updated_at)
                VALUES ($1, $2, 1, 1, NOW(), NOW())
                ON CONFLICT (server_id, user_id) DO UPDATE
                SET count = activity_counters.count + 1,
                    total = activity_counters.total + 1,
                    updated_at = NOW()
                "#,
            )
            .bind(record.server_id.into_inner())
            .bind(record.user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_in_window(
        &self,
        server_id: Snowflake,
        window: &AggregationWindow,
    ) -> RepoResult<Vec<UserCount>> {
        // Both bounds inclusive; ordered by each user's first message in the
        // window so the ranking's stable sort has a deterministic tie order.
        let rows = sqlx::query_as::<_, UserCountRow>(
            r#"
            SELECT user_id, COUNT(*) AS count
            FROM messages
            WHERE server_id = $1 AND ts >= $2 AND ts <= $3
            GROUP BY user_id
            ORDER BY MIN(ts)
            "#,
        )
        .bind(server_id.into_inner())
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn current_counts(&self, server_id: Snowflake) -> RepoResult<Vec<UserCount>> {
        let rows = sqlx::query_as::<_, UserCountRow>(
            r#"
            SELECT user_id, count
            FROM activity_counters
            WHERE server_id = $1 AND count > 0
            ORDER BY created_at
            "#,
        )
        .bind(server_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn counter_for(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ActivityCounter>> {
        let result = sqlx::query_as::<_, ActivityCounterModel>(
            r#"
            SELECT server_id, user_id, count, total, updated_at
            FROM activity_counters
            WHERE server_id = $1 AND user_id = $2
            "#,
        )
        .bind(server_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ActivityCounter::from))
    }

    #[instrument(skip(self))]
    async fn reset(&self, server_id: Snowflake) -> RepoResult<()> {
        // Lifetime totals survive; only the per-period tally is cleared.
        sqlx::query(
            r#"
            UPDATE activity_counters
            SET count = 0, updated_at = NOW()
            WHERE server_id = $1 AND count > 0
            "#,
        )
        .bind(server_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages WHERE ts < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
