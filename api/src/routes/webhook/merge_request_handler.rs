use git_context_engine::ChangeRequestId;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    review::prompt::{merge_request_comment, merge_request_messages},
    routes::webhook::{
        payload::{required_scalar, required_str, required_u64},
        webhook_route::WebhookOutcome,
    },
};

/// Only MR-open events trigger a review.
const OPEN_ACTION: &str = "open";

/// Reviews a freshly opened merge request and posts the result as a note.
///
/// Fetch failures abort with an error; generation failures become fallback
/// text; a failed post only flips `comment_posted`.
#[instrument(
    name = "merge_request",
    skip_all,
    fields(project = tracing::field::Empty, iid = tracing::field::Empty)
)]
pub async fn handle_merge_request(state: &AppState, payload: &Value) -> AppResult<WebhookOutcome> {
    let action = required_str(payload, "object_attributes.action")?;
    if action != OPEN_ACTION {
        info!(action, "merge request is not being opened; ignoring");
        return Ok(WebhookOutcome::Ignored("No es un MR de apertura".into()));
    }

    let id = ChangeRequestId {
        project: required_scalar(payload, "project.id")?,
        iid: required_u64(payload, "object_attributes.iid")?,
    };
    let project_name = required_str(payload, "project.name")?;
    let span = tracing::Span::current();
    span.record("project", id.project.as_str());
    span.record("iid", id.iid);
    info!(project_name, "reviewing merge request");

    let changes = state
        .gitlab
        .fetch_mr_changes(&id)
        .await
        .map_err(|e| AppError::from_fetch("failed to fetch merge request changes", e))?;
    let diff = changes.concatenated_diff();
    debug!(diff_len = diff.len(), "merge request diff assembled");

    let review = state.reviewer.generate(&merge_request_messages(&diff)).await;
    let comment = merge_request_comment(&review);

    let comment_posted = match state.gitlab.post_mr_note(&id, &comment).await {
        Ok(()) => {
            info!("review note posted");
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to post review note");
            false
        }
    };

    Ok(WebhookOutcome::Reviewed { comment_posted })
}
