//! Aggregation-history database model

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use tally_core::{AggregationHistory, AggregationWindow, RankedEntry, Snowflake};

/// Database model for the aggregation_history table.
///
/// The ranked list is stored as JSONB; records are append-only so the
/// serialized shape never needs migrating in place.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryModel {
    pub id: i64,
    pub server_id: i64,
    pub aggregated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub ranked: Json<Vec<RankedEntry>>,
}

impl From<HistoryModel> for AggregationHistory {
    fn from(model: HistoryModel) -> Self {
        Self {
            server_id: Snowflake::new(model.server_id),
            aggregated_at: model.aggregated_at,
            window: AggregationWindow {
                start: model.window_start,
                end: model.window_end,
            },
            ranked: model.ranked.0,
        }
    }
}
