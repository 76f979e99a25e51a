pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod review;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::{app_config::AppConfig, app_state::AppState};
pub use crate::error_handler::AppError;

use crate::{
    middleware_layer::request_id::request_id,
    routes::{
        health_route::health_route,
        root_route::{not_found, root_route},
        webhook::webhook_route::webhook_route,
    },
};

/// Builds the HTTP surface over shared, read-only state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_route))
        .route("/health", get(health_route))
        .route("/webhook", post(webhook_route))
        .fallback(not_found)
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Builds the clients, binds `config.listen_addr` and serves until Ctrl+C.
pub async fn start(config: AppConfig) -> Result<(), AppError> {
    let addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "review bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
