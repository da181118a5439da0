//! Middleware stack
//!
//! Request tracing, a hard timeout generous enough for a full aggregation
//! run (the blanket revocation sweep can take a while on large servers),
//! and permissive CORS for tooling.

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Timeout for a single request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Apply the middleware stack to the router
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
}
