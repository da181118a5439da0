//! Authorization-gate extractor
//!
//! Every server-scoped command passes through this gate: the `server_id`
//! path parameter is parsed and the server must have redeemed an
//! authorization code. Code redemption itself is the one route that uses a
//! plain path extractor instead.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use tally_core::Snowflake;
use tally_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// A server that passed the authorization gate
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedServer(pub Snowflake);

#[async_trait]
impl FromRequestParts<AppState> for AuthorizedServer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(params): Path<HashMap<String, String>> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::invalid_path("missing path parameters"))?;

        let raw = params
            .get("server_id")
            .ok_or_else(|| ApiError::invalid_path("missing server_id"))?;
        let server_id: Snowflake = raw
            .parse()
            .map_err(|_| ApiError::invalid_path("invalid server_id format"))?;

        AuthService::new(state.service_context())
            .require_authorized(server_id)
            .await
            .map_err(ApiError::Service)?;

        Ok(Self(server_id))
    }
}
