//! Request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use tally_core::{MessageRecord, Snowflake};

/// Message-created webhook payload from the chat platform
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageEventRequest {
    pub server_id: Snowflake,
    pub user_id: Snowflake,
    pub message_id: Snowflake,
    pub timestamp: DateTime<Utc>,
    /// The author's role set at delivery time, used for the exclusion gate
    #[serde(default)]
    pub author_role_ids: Vec<Snowflake>,
    #[serde(default)]
    pub author_is_bot: bool,
}

impl MessageEventRequest {
    /// The log row this event produces
    pub fn to_record(&self) -> MessageRecord {
        MessageRecord::new(self.server_id, self.user_id, self.message_id, self.timestamp)
    }
}

/// set-role-config command body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetRoleConfigRequest {
    pub first_role_id: Snowflake,
    pub other_role_id: Snowflake,
}

/// run-aggregation command body.
///
/// Either a windowed run over the message log (`start`/`end`, each a
/// `YYYYMMDD` date or the sentinels `today`/`since-last`), or a quick run
/// over the live counters (`source: "live"`). The two modes rank from
/// different stores and are not interchangeable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RunAggregationRequest {
    #[validate(length(min = 1, max = 16))]
    pub start: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub end: Option<String>,
    /// "log" (default) or "live"
    #[validate(length(min = 1, max = 8))]
    pub source: Option<String>,
}

/// set-first-role-color command body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetRoleColorRequest {
    /// Hex color, with or without a leading '#'
    #[validate(length(min = 6, max = 7))]
    pub color: String,
}

/// Code-redemption body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RedeemCodeRequest {
    #[validate(length(equal = 16))]
    pub code: String,
}
