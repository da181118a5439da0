//! Bot-administrator bearer-token extractor
//!
//! Minting authorization codes is restricted to the operator; the static
//! admin token from configuration stands in for the reference bot's
//! hardcoded administrator account.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::response::ApiError;
use crate::state::AppState;

/// Proof that the request carried the configured admin bearer token
#[derive(Debug, Clone, Copy)]
pub struct AdminToken;

#[async_trait]
impl FromRequestParts<AppState> for AdminToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingAuth)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MissingAuth)?;

        if token != state.config().admin.token {
            return Err(ApiError::InvalidAdminToken);
        }
        Ok(Self)
    }
}
