use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    core::{app_state::AppState, secret::token_matches},
    error_handler::{AppError, AppResult},
    routes::webhook::{
        merge_request_handler::handle_merge_request,
        payload::{describe_kind, is_empty_payload, object_kind},
        push_handler::handle_push,
    },
};

/// Header GitLab uses to carry the webhook secret.
pub const GITLAB_TOKEN_HEADER: &str = "x-gitlab-token";
/// Set on a successful acknowledgment whose comment could not be posted.
pub const REVIEW_COMMENT_HEADER: &str = "x-review-comment";

/// What a handler did with an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A review was generated and a post was attempted.
    Reviewed { comment_posted: bool },
    /// The event was accepted without any outbound call.
    Ignored(String),
}

impl IntoResponse for WebhookOutcome {
    fn into_response(self) -> Response {
        match self {
            WebhookOutcome::Reviewed { comment_posted } => {
                let mut res = (StatusCode::OK, "OK").into_response();
                if !comment_posted {
                    res.headers_mut()
                        .insert(REVIEW_COMMENT_HEADER, HeaderValue::from_static("failed"));
                }
                res
            }
            WebhookOutcome::Ignored(msg) => (StatusCode::OK, msg).into_response(),
        }
    }
}

/// POST /webhook
///
/// Authenticates the delivery, parses the body and routes by `object_kind`.
/// Unknown kinds are acknowledged with 200 and no outbound call.
#[instrument(name = "webhook", skip_all, fields(kind = tracing::field::Empty))]
pub async fn webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<WebhookOutcome> {
    let provided = headers.get(GITLAB_TOKEN_HEADER).map(|h| h.as_bytes());
    if !token_matches(provided, state.config.webhook_secret.as_bytes()) {
        warn!(header_present = provided.is_some(), "webhook rejected: bad token");
        return Err(AppError::Unauthorized);
    }

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "webhook body is not valid JSON");
        AppError::InvalidJson(e.to_string())
    })?;
    if is_empty_payload(&payload) {
        warn!("webhook body is empty");
        return Err(AppError::EmptyPayload);
    }

    let kind = object_kind(&payload);
    tracing::Span::current().record("kind", kind.unwrap_or("-"));
    info!("webhook accepted");

    match kind {
        Some("merge_request") => handle_merge_request(&state, &payload).await,
        Some("push") => handle_push(&state, &payload).await,
        _ => {
            let kind = describe_kind(&payload);
            info!(%kind, "unsupported event kind; ignoring");
            Ok(WebhookOutcome::Ignored(format!(
                "Tipo de evento no soportado: {kind}"
            )))
        }
    }
}
