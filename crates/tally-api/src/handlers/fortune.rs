//! Fortune handler

use axum::{
    extract::{Path, State},
    Json,
};
use tally_core::Snowflake;
use tally_service::{FortuneResponse, FortuneService};

use crate::extractors::AuthorizedServer;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Draw a fortune for a member
///
/// POST /servers/{server_id}/members/{user_id}/fortune
pub async fn draw_fortune(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    Path((_, user_id)): Path<(String, String)>,
) -> ApiResult<Json<FortuneResponse>> {
    let user_id: Snowflake = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("invalid user_id format"))?;

    let service = FortuneService::new(state.service_context());
    let response = service.draw(server_id, user_id).await?;
    Ok(Json(response))
}
