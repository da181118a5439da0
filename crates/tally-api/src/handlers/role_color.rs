//! First-tier role color handler

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tally_core::RoleColor;
use tally_service::{RegistryService, SetRoleColorRequest};

use crate::extractors::{AuthorizedServer, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Change the first-tier role's display color
///
/// PUT /servers/{server_id}/role-color
pub async fn set_first_role_color(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    ValidatedJson(request): ValidatedJson<SetRoleColorRequest>,
) -> ApiResult<Json<Value>> {
    let color = RoleColor::from_hex(&request.color).map_err(ApiError::Domain)?;
    let service = RegistryService::new(state.service_context());
    service.set_first_role_color(server_id, color).await?;
    Ok(Json(json!({ "color": color.to_string() })))
}
