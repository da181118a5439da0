//! Role-configuration handlers

use axum::{extract::State, Json};
use tally_service::{RegistryService, RoleConfigResponse, SetRoleConfigRequest};

use crate::extractors::{AuthorizedServer, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Get the server's tier-role configuration
///
/// GET /servers/{server_id}/role-config
pub async fn get_role_config(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
) -> ApiResult<Json<RoleConfigResponse>> {
    let service = RegistryService::new(state.service_context());
    let config = service
        .get_role_config(server_id)
        .await?
        .ok_or_else(|| ApiError::Service(tally_service::ServiceError::not_found(
            "RoleConfig",
            server_id.to_string(),
        )))?;
    Ok(Json(RoleConfigResponse::from(&config)))
}

/// Fully replace the server's tier-role configuration
///
/// PUT /servers/{server_id}/role-config
pub async fn set_role_config(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    ValidatedJson(request): ValidatedJson<SetRoleConfigRequest>,
) -> ApiResult<Json<RoleConfigResponse>> {
    let service = RegistryService::new(state.service_context());
    let config = service
        .set_role_config(server_id, request.first_role_id, request.other_role_id)
        .await?;
    Ok(Json(RoleConfigResponse::from(&config)))
}
