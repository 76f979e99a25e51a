use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use git_context_engine::GitContextEngineError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::core::app_config::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("invalid or missing X-Gitlab-Token")]
    Unauthorized,

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("empty payload")]
    EmptyPayload,

    #[error("missing field in payload: {0}")]
    MissingField(String),

    #[error("invalid field in payload: {field}: {reason}")]
    InvalidField { field: String, reason: &'static str },

    #[error("not found")]
    NotFound,

    // --- Upstream (GitLab reads) ---
    #[error("{context}: upstream status {status}")]
    Upstream { context: &'static str, status: u16 },

    #[error("{context}: upstream timed out after {after:?}")]
    UpstreamTimeout {
        context: &'static str,
        after: Duration,
    },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::InvalidJson(_)
            | AppError::EmptyPayload
            | AppError::MissingField(_)
            | AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream { .. }
            | AppError::Internal(_)
            | AppError::Config(_)
            | AppError::Bind { .. }
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidJson(_) => "INVALID_JSON",
            AppError::EmptyPayload => "EMPTY_PAYLOAD",
            AppError::MissingField(_) => "MISSING_FIELD",
            AppError::InvalidField { .. } => "INVALID_FIELD",
            AppError::NotFound => "NOT_FOUND",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::UpstreamTimeout { .. } => "UPSTREAM_TIMEOUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Maps a failed GitLab read. The status (when present) stays visible to
    /// the caller; timeouts get their own kind.
    pub fn from_fetch(context: &'static str, err: GitContextEngineError) -> Self {
        match err {
            GitContextEngineError::UnexpectedStatus { status, .. } => {
                AppError::Upstream { context, status }
            }
            GitContextEngineError::Timeout(after) => AppError::UpstreamTimeout { context, after },
            other => AppError::Internal(format!("{context}: {other}")),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
