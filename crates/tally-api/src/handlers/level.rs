//! Level handler

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tally_core::Snowflake;
use tally_service::{LevelResponse, LevelService};

use crate::extractors::AuthorizedServer;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for the level endpoint
#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    /// "json" (default) or "card" to include the rendered PNG
    pub format: Option<String>,
}

/// A member's leveling summary
///
/// GET /servers/{server_id}/members/{user_id}/level
pub async fn get_level(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    Path((_, user_id)): Path<(String, String)>,
    Query(query): Query<LevelQuery>,
) -> ApiResult<Json<LevelResponse>> {
    let user_id: Snowflake = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("invalid user_id format"))?;

    let service = LevelService::new(state.service_context());
    let response = match query.format.as_deref() {
        Some("card") => service.level_card(server_id, user_id).await?,
        _ => service.level_info(server_id, user_id).await?,
    };
    Ok(Json(response))
}
