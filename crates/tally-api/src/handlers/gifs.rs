//! GIF search handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tally_service::{GifResponse, GifService};

use crate::extractors::AuthorizedServer;
use crate::response::ApiResult;
use crate::state::AppState;

/// Query parameters for GIF search
#[derive(Debug, Deserialize)]
pub struct GifQuery {
    /// Free text, or a pasted share URL
    pub q: String,
}

/// Search GIFs
///
/// GET /servers/{server_id}/gifs
pub async fn search_gifs(
    State(state): State<AppState>,
    AuthorizedServer(_server_id): AuthorizedServer,
    Query(query): Query<GifQuery>,
) -> ApiResult<Json<Vec<GifResponse>>> {
    let service = GifService::new(state.service_context());
    let results = service.search(&query.q).await?;
    Ok(Json(results))
}
