//! Exclusion-set handlers

use axum::{
    extract::{Path, State},
    Json,
};
use tally_core::Snowflake;
use tally_service::{ExclusionChangeResponse, RegistryService};

use crate::extractors::AuthorizedServer;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

fn parse_role_id(raw: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("invalid role_id format"))
}

/// List the excluded roles
///
/// GET /servers/{server_id}/exclusions
pub async fn list_exclusions(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
) -> ApiResult<Json<Vec<Snowflake>>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.get_exclusions(server_id).await?))
}

/// Add a role to the exclusion set
///
/// PUT /servers/{server_id}/exclusions/{role_id}
pub async fn add_exclusion(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    Path((_, role_id)): Path<(String, String)>,
) -> ApiResult<Json<ExclusionChangeResponse>> {
    let role_id = parse_role_id(&role_id)?;
    let service = RegistryService::new(state.service_context());
    let changed = service.add_exclusion(server_id, role_id).await?;
    let exclusions = service.get_exclusions(server_id).await?;
    Ok(Json(ExclusionChangeResponse { changed, exclusions }))
}

/// Remove a role from the exclusion set
///
/// DELETE /servers/{server_id}/exclusions/{role_id}
pub async fn remove_exclusion(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    Path((_, role_id)): Path<(String, String)>,
) -> ApiResult<Json<ExclusionChangeResponse>> {
    let role_id = parse_role_id(&role_id)?;
    let service = RegistryService::new(state.service_context());
    let changed = service.remove_exclusion(server_id, role_id).await?;
    let exclusions = service.get_exclusions(server_id).await?;
    Ok(Json(ExclusionChangeResponse { changed, exclusions }))
}
