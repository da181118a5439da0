//! Streak handlers

use axum::{extract::State, Json};
use tally_service::{StreakResetResponse, StreakService};

use crate::extractors::AuthorizedServer;
use crate::response::ApiResult;
use crate::state::AppState;

/// Zero every streak in the server
///
/// POST /servers/{server_id}/streaks/reset
pub async fn reset_all_streaks(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
) -> ApiResult<Json<StreakResetResponse>> {
    let service = StreakService::new(state.service_context());
    let affected = service.reset_all(server_id).await?;
    Ok(Json(StreakResetResponse { affected }))
}
