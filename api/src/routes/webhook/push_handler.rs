use git_context_engine::CommitRef;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    review::prompt::{push_comment, push_messages},
    routes::webhook::{
        payload::{UNKNOWN_PROJECT, optional_str, required_scalar},
        webhook_route::WebhookOutcome,
    },
};

/// Reviews the head commit of a push and comments on it.
#[instrument(
    name = "push",
    skip_all,
    fields(project = tracing::field::Empty, sha = tracing::field::Empty)
)]
pub async fn handle_push(state: &AppState, payload: &Value) -> AppResult<WebhookOutcome> {
    let commit = CommitRef {
        project: required_scalar(payload, "project_id")?,
        sha: required_scalar(payload, "after")?,
    };
    let project_name = optional_str(payload, "project.name").unwrap_or(UNKNOWN_PROJECT);
    let span = tracing::Span::current();
    span.record("project", commit.project.as_str());
    span.record("sha", commit.sha.as_str());
    info!(project_name, "reviewing pushed commit");

    let records = state
        .gitlab
        .fetch_commit_diff(&commit)
        .await
        .map_err(|e| AppError::from_fetch("failed to fetch commit diff", e))?;
    let diff = records.to_text();
    debug!(files = records.records.len(), diff_len = diff.len(), "commit diff assembled");

    let review = state.reviewer.generate(&push_messages(&diff)).await;
    let comment = push_comment(&review);

    let comment_posted = match state.gitlab.post_commit_comment(&commit, &comment).await {
        Ok(()) => {
            info!("review comment posted");
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to post commit comment");
            false
        }
    };

    Ok(WebhookOutcome::Reviewed { comment_posted })
}
