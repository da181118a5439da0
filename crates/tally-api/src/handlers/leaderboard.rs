//! Leaderboard handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tally_core::Snowflake;
use tally_service::{LeaderboardResponse, LeaderboardService};

use crate::extractors::AuthorizedServer;
use crate::response::ApiResult;
use crate::state::AppState;

/// Query parameters for the leaderboard page
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    /// When set, the caller's own rank is attached if it falls off-page
    pub viewer_id: Option<Snowflake>,
}

fn default_page() -> u32 {
    1
}

/// One page of the live leaderboard
///
/// GET /servers/{server_id}/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let service = LeaderboardService::new(state.service_context());
    let page = service.page(server_id, query.page, query.viewer_id).await?;
    Ok(Json(page))
}
