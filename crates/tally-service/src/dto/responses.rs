//! Response DTOs

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;

use tally_core::{AggregationHistory, GifResult, RankedEntry, RoleConfig, Snowflake, Tier};

use crate::services::AggregationOutcome;

fn encode_card(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// One ranked user in an aggregation response
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntryResponse {
    pub user_id: Snowflake,
    pub count: i64,
    pub rank: u32,
    pub tier: Tier,
}

impl From<&RankedEntry> for RankedEntryResponse {
    fn from(entry: &RankedEntry) -> Self {
        Self {
            user_id: entry.user_id,
            count: entry.count,
            rank: entry.rank,
            tier: entry.tier,
        }
    }
}

/// Result of a completed aggregation run
#[derive(Debug, Clone, Serialize)]
pub struct AggregationResponse {
    pub aggregated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub ranking: Vec<RankedEntryResponse>,
    /// Members skipped over permission/departure failures during role updates
    pub skipped_members: u32,
    pub completed_with_warnings: bool,
    /// The rendered ranking card (PNG, base64)
    pub card_png: String,
}

impl From<&AggregationOutcome> for AggregationResponse {
    fn from(outcome: &AggregationOutcome) -> Self {
        let history: &AggregationHistory = &outcome.history;
        Self {
            aggregated_at: history.aggregated_at,
            window_start: history.window.start,
            window_end: history.window.end,
            ranking: history.ranked.iter().map(RankedEntryResponse::from).collect(),
            skipped_members: outcome.skipped_members,
            completed_with_warnings: outcome.completed_with_warnings(),
            card_png: encode_card(&outcome.card_png),
        }
    }
}

/// Current role configuration
#[derive(Debug, Clone, Serialize)]
pub struct RoleConfigResponse {
    pub server_id: Snowflake,
    pub first_role_id: Snowflake,
    pub other_role_id: Snowflake,
    pub updated_at: DateTime<Utc>,
}

impl From<&RoleConfig> for RoleConfigResponse {
    fn from(config: &RoleConfig) -> Self {
        Self {
            server_id: config.server_id,
            first_role_id: config.first_role_id,
            other_role_id: config.other_role_id,
            updated_at: config.updated_at,
        }
    }
}

/// Result of an exclusion add/remove
#[derive(Debug, Clone, Serialize)]
pub struct ExclusionChangeResponse {
    pub changed: bool,
    pub exclusions: Vec<Snowflake>,
}

/// Result of a message-created event
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcomeResponse {
    /// False when the event was gated out (unauthorized server, excluded
    /// author, bot author)
    pub counted: bool,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryResponse {
    /// One-based display rank
    pub rank: u32,
    pub user_id: Snowflake,
    pub count: i64,
}

/// One page of the live-counter leaderboard
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub page: u32,
    pub total_pages: u32,
    pub total_users: u64,
    pub entries: Vec<LeaderboardEntryResponse>,
    /// The caller's own rank when requested and off-page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<LeaderboardEntryResponse>,
}

/// Leveling summary for one member
#[derive(Debug, Clone, Serialize)]
pub struct LevelResponse {
    pub user_id: Snowflake,
    pub level: u32,
    pub xp: i64,
    pub total_messages: i64,
    pub xp_into_level: i64,
    pub xp_needed: i64,
    pub progress: f32,
    pub messages_to_next_level: i64,
    /// Level card (PNG, base64), present when rendering was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_png: Option<String>,
}

impl LevelResponse {
    pub fn with_card(mut self, bytes: &[u8]) -> Self {
        self.card_png = Some(encode_card(bytes));
        self
    }
}

/// A fortune draw
#[derive(Debug, Clone, Serialize)]
pub struct FortuneResponse {
    pub grade: String,
    pub title: String,
    pub message: String,
    /// Fortune card (PNG, base64)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_png: Option<String>,
}

impl FortuneResponse {
    pub fn with_card(mut self, bytes: &[u8]) -> Self {
        self.card_png = Some(encode_card(bytes));
        self
    }
}

/// GIF search hit
#[derive(Debug, Clone, Serialize)]
pub struct GifResponse {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl From<GifResult> for GifResponse {
    fn from(result: GifResult) -> Self {
        Self {
            id: result.id,
            title: result.title,
            url: result.url,
            preview_url: result.preview_url,
        }
    }
}

/// Result of reset-all-streaks
#[derive(Debug, Clone, Serialize)]
pub struct StreakResetResponse {
    pub affected: u64,
}

/// A freshly minted authorization code
#[derive(Debug, Clone, Serialize)]
pub struct CodeResponse {
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "ok" }
    }
}

/// Readiness probe body
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
}

impl ReadinessResponse {
    pub fn ready(database: bool) -> Self {
        Self {
            ready: database,
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn test_readiness_tracks_database() {
        assert!(ReadinessResponse::ready(true).ready);
        assert!(!ReadinessResponse::ready(false).ready);
    }

    #[test]
    fn test_encode_card_is_base64() {
        let encoded = encode_card(&[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(encoded, "iVBORw==");
    }
}
