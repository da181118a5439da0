//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use tally_common::{AppConfig, AppError};
use tally_core::GifProvider;
use tally_db::{
    create_pool, PgActivityRepository, PgAuthRepository, PgExclusionRepository,
    PgHistoryRepository, PgRoleColorRepository, PgRoleConfigRepository, PgStreakRepository,
};
use tally_platform::{GifClient, RestMembershipGateway};
use tally_render::TallyCardRenderer;
use tally_service::{ActivityService, ServiceContext};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = apply_middleware(create_router());
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = tally_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Outbound collaborators
    let membership = RestMembershipGateway::new(
        config.platform.base_url.clone(),
        &config.platform.bot_token,
    )
    .map_err(|e| AppError::Config(format!("membership client: {e}")))?;

    let gif: Option<Arc<dyn GifProvider>> = config.gif.api_key.as_ref().map(|key| {
        Arc::new(GifClient::new(config.gif.base_url.clone(), key.clone())) as Arc<dyn GifProvider>
    });
    if gif.is_none() {
        warn!("GIF_API_KEY not set; GIF search is disabled");
    }

    // Card renderer (fonts load once here)
    let renderer = TallyCardRenderer::from_config(&config.render)
        .map_err(|e| AppError::Config(format!("renderer: {e}")))?;

    // Build service context
    let service_context = ServiceContext::builder()
        .activity_repo(Arc::new(PgActivityRepository::new(pool.clone())))
        .role_config_repo(Arc::new(PgRoleConfigRepository::new(pool.clone())))
        .exclusion_repo(Arc::new(PgExclusionRepository::new(pool.clone())))
        .streak_repo(Arc::new(PgStreakRepository::new(pool.clone())))
        .history_repo(Arc::new(PgHistoryRepository::new(pool.clone())))
        .auth_repo(Arc::new(PgAuthRepository::new(pool.clone())))
        .role_color_repo(Arc::new(PgRoleColorRepository::new(pool.clone())))
        .membership(Arc::new(membership))
        .renderer(Arc::new(renderer))
        .gif(gif)
        .day_offset_hours(config.aggregation.utc_offset_hours)
        .build()
        .map_err(AppError::Config)?;

    Ok(AppState::new(service_context, config, pool))
}

/// Spawn the 24-hour message-retention pruning task
pub fn spawn_retention_task(state: &AppState) {
    let ctx: ServiceContext = state.service_context().clone();
    let horizon_days = state.config().retention.message_days;
    let interval = Duration::from_secs(u64::from(state.config().retention.prune_interval_hours) * 3600);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let service = ActivityService::new(&ctx);
            if let Err(e) = service.prune_old_messages(horizon_days).await {
                warn!(error = %e, "Message retention pruning failed");
            }
        }
    });
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Background retention pruning
    spawn_retention_task(&state);

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
