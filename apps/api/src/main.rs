//! Crawlpool API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_services;
mod dto;
mod error;
mod handlers;
mod state;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use crawlpool_core::AppError;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let pool = api_services::database::connect_and_migrate(&config).await?;
    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let redis_client = api_services::redis::build_redis_client(config.redis_url.as_str())?;
    let app_state = AppState::build(pool, redis_client);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .nest(
            "/api/twitter/accounts",
            handlers::accounts::account_routes(app_state.twitter),
        )
        .nest(
            "/api/instagram/accounts",
            handlers::accounts::account_routes(app_state.instagram),
        )
        .nest(
            "/api/tiktok/accounts",
            handlers::accounts::account_routes(app_state.tiktok),
        )
        // Dropping a timed-out request aborts its pending store calls, so a
        // lease pipeline is never submitted after the deadline.
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http());

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "crawlpool-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
