//! Aggregation history - append-only audit trail of completed runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AggregationWindow, Snowflake, Tier};

/// One entry of a recorded ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub user_id: Snowflake,
    pub count: i64,
    /// Zero-based rank (0 = the "first" tier holder)
    pub rank: u32,
    pub tier: Tier,
}

/// One record per successful aggregation run; never mutated after creation.
///
/// The ranked list reflects the ranking as computed, not the subset of users
/// that actually received roles — partial grant failures do not thin it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationHistory {
    pub server_id: Snowflake,
    pub aggregated_at: DateTime<Utc>,
    pub window: AggregationWindow,
    pub ranked: Vec<RankedEntry>,
}

impl AggregationHistory {
    /// Build a record from a ranked (user, count) list, assigning tiers by
    /// rank position: rank 0 gets `first`, every other rank gets `other`.
    pub fn from_ranking(
        server_id: Snowflake,
        aggregated_at: DateTime<Utc>,
        window: AggregationWindow,
        ranking: &[(Snowflake, i64)],
    ) -> Self {
        let ranked = ranking
            .iter()
            .enumerate()
            .map(|(rank, (user_id, count))| RankedEntry {
                user_id: *user_id,
                count: *count,
                rank: rank as u32,
                tier: Tier::for_rank(rank),
            })
            .collect();
        Self {
            server_id,
            aggregated_at,
            window,
            ranked,
        }
    }

    /// The recorded top user, if any
    pub fn first_place(&self) -> Option<&RankedEntry> {
        self.ranked.iter().find(|entry| entry.tier == Tier::First)
    }
}
