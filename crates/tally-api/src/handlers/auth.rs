//! Authorization handlers - code minting and redemption
//!
//! Redemption is the single server-scoped route that bypasses the
//! authorization gate (a locked server could never unlock otherwise).

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tally_core::{ServerAuthorization, Snowflake};
use tally_service::{AuthService, CodeResponse, RedeemCodeRequest};

use crate::extractors::{AdminToken, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Mint a fresh single-use authorization code (operator only)
///
/// POST /auth/codes
pub async fn mint_code(
    State(state): State<AppState>,
    _admin: AdminToken,
) -> ApiResult<Created<Json<CodeResponse>>> {
    let service = AuthService::new(state.service_context());
    let code = service.generate_code().await?;
    Ok(Created(Json(CodeResponse {
        code: code.code,
        created_at: code.created_at,
    })))
}

/// List every authorized server (operator only)
///
/// GET /auth/servers
pub async fn list_authorized_servers(
    State(state): State<AppState>,
    _admin: AdminToken,
) -> ApiResult<Json<Vec<ServerAuthorization>>> {
    let service = AuthService::new(state.service_context());
    Ok(Json(service.list_authorizations().await?))
}

/// Redeem a code and unlock the server
///
/// POST /servers/{server_id}/auth/redeem
pub async fn redeem_code(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RedeemCodeRequest>,
) -> ApiResult<Json<Value>> {
    let server_id: Snowflake = server_id
        .parse()
        .map_err(|_| ApiError::invalid_path("invalid server_id format"))?;

    let service = AuthService::new(state.service_context());
    service.redeem_code(&request.code, server_id).await?;
    Ok(Json(json!({ "authorized": true })))
}
