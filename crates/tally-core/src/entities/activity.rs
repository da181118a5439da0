//! Activity entities - per-user chat counters and the raw message log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Live chat counter for one (server, user) pair.
///
/// `count` is the resettable per-period tally; `total` is a monotonic
/// lifetime tally that survives aggregation resets and feeds the leveling
/// feature. Both only ever increase outside of `reset`, which clears `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCounter {
    pub server_id: Snowflake,
    pub user_id: Snowflake,
    pub count: i64,
    pub total: i64,
    pub updated_at: DateTime<Utc>,
}

/// One row of the append-only message log.
///
/// Used only to answer windowed count queries; pruned past the retention
/// horizon by a background job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub server_id: Snowflake,
    pub user_id: Snowflake,
    pub message_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(
        server_id: Snowflake,
        user_id: Snowflake,
        message_id: Snowflake,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            server_id,
            user_id,
            message_id,
            timestamp,
        }
    }
}

/// A (user, count) pair as returned by the Activity Store.
///
/// Count retrieval returns these in the store's natural encounter order
/// (first message in the window, or counter-row creation for live counts);
/// the ranking's stable sort preserves that order for equal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    pub user_id: Snowflake,
    pub count: i64,
}

impl UserCount {
    pub fn new(user_id: Snowflake, count: i64) -> Self {
        Self { user_id, count }
    }
}
