//! Route definitions
//!
//! All API routes organized by command group and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{
    aggregation, auth, events, exclusions, fortune, gifs, health, leaderboard, level, role_color,
    role_config, streaks,
};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health probes)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately so probes bypass middleware)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(event_routes())
        .merge(auth_routes())
        .merge(server_routes())
}

/// Webhook ingest routes
fn event_routes() -> Router<AppState> {
    Router::new().route("/events/message", post(events::message_created))
}

/// Authorization routes (code minting is operator-only; redemption is the
/// one server-scoped route outside the gate)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/codes", post(auth::mint_code))
        .route("/auth/servers", get(auth::list_authorized_servers))
        .route("/servers/:server_id/auth/redeem", post(auth::redeem_code))
}

/// Server-scoped command routes, all behind the authorization gate
fn server_routes() -> Router<AppState> {
    Router::new()
        // Role configuration
        .route("/servers/:server_id/role-config", get(role_config::get_role_config))
        .route("/servers/:server_id/role-config", put(role_config::set_role_config))
        // Exclusion set
        .route("/servers/:server_id/exclusions", get(exclusions::list_exclusions))
        .route("/servers/:server_id/exclusions/:role_id", put(exclusions::add_exclusion))
        .route(
            "/servers/:server_id/exclusions/:role_id",
            delete(exclusions::remove_exclusion),
        )
        // Aggregation
        .route("/servers/:server_id/aggregation", post(aggregation::run_aggregation))
        // Streaks
        .route("/servers/:server_id/streaks/reset", post(streaks::reset_all_streaks))
        // First-tier role color
        .route("/servers/:server_id/role-color", put(role_color::set_first_role_color))
        // Leaderboard and leveling
        .route("/servers/:server_id/leaderboard", get(leaderboard::get_leaderboard))
        .route(
            "/servers/:server_id/members/:user_id/level",
            get(level::get_level),
        )
        // Mini-features
        .route(
            "/servers/:server_id/members/:user_id/fortune",
            post(fortune::draw_fortune),
        )
        .route("/servers/:server_id/gifs", get(gifs::search_gifs))
}
