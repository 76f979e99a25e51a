use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::app_state::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: &'static str,
    pub openai_configured: bool,
    pub gitlab_configured: bool,
    pub expected_token_configured: bool,
    /// Informational only; never affects `status`.
    pub azure_configured: bool,
}

impl HealthStatus {
    pub fn from_state(state: &AppState) -> Self {
        let cfg = &state.config;
        let openai_configured = !cfg.llm.api_key.trim().is_empty();
        let gitlab_configured =
            !cfg.gitlab.token.trim().is_empty() && !cfg.gitlab.base_api.trim().is_empty();
        let expected_token_configured = !cfg.webhook_secret.trim().is_empty();
        let healthy = openai_configured && gitlab_configured && expected_token_configured;

        Self {
            status: if healthy { "healthy" } else { "unhealthy" },
            openai_configured,
            gitlab_configured,
            expected_token_configured,
            azure_configured: cfg.azure_configured,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /health
pub async fn health_route(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    let health = HealthStatus::from_state(&state);
    if health.is_healthy() {
        info!("health check ok");
        (StatusCode::OK, Json(health))
    } else {
        warn!(?health, "health check failed: incomplete configuration");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(health))
    }
}
