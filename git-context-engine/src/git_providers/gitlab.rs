//! GitLab provider (REST v4) for review inputs and review output.
//!
//! Endpoints used:
//!   * GET  /projects/:id/merge_requests/:iid/changes
//!   * GET  /projects/:id/repository/commits/:sha/diff
//!   * POST /projects/:id/merge_requests/:iid/notes
//!   * POST /projects/:id/repository/commits/:sha/comments
//!
//! Reads must answer `200 OK`, writes `201 Created`; anything else is an
//! [`GitContextEngineError::UnexpectedStatus`]. No call is retried.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::errors::{
    GitContextEngineConfigError, GitContextEngineError, GitContextEngineResult, error_detail,
    from_transport,
};
use crate::git_providers::ProviderConfig;
use crate::git_providers::types::*;

/// GitLab HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_api: String, // e.g. "https://gitlab.com/api/v4"
    token: String,    // "PRIVATE-TOKEN"
    timeout: Duration,
}

impl GitLabClient {
    /// Constructs a GitLab client with its own HTTP instance, auth token and
    /// per-call timeout.
    pub fn new(cfg: ProviderConfig) -> GitContextEngineResult<Self> {
        if cfg.token.trim().is_empty() {
            return Err(GitContextEngineConfigError::MissingToken.into());
        }
        let base = cfg.base_api.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(GitContextEngineConfigError::InvalidBaseUrl(cfg.base_api.clone()).into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs);
        let http = Client::builder()
            .user_agent("review-bridge/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| GitContextEngineConfigError::Client(e.to_string()))?;

        debug!("Creating GitLabClient with base_api={}", base);
        Ok(Self {
            http,
            base_api: base.to_string(),
            token: cfg.token,
            timeout,
        })
    }

    /// Fetches the change set of a merge request.
    pub async fn fetch_mr_changes(&self, id: &ChangeRequestId) -> GitContextEngineResult<MrChanges> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/changes",
            self.base_api,
            urlencoding::encode(&id.project),
            id.iid
        );
        debug!("GitLab fetch_mr_changes: {}", url);

        let changes: MrChanges = self.get_json(url).await?;
        info!(
            project = %id.project,
            iid = id.iid,
            files = changes.changes.len(),
            "merge request changes fetched"
        );
        Ok(changes)
    }

    /// Fetches the per-file diff records of a single commit.
    pub async fn fetch_commit_diff(&self, commit: &CommitRef) -> GitContextEngineResult<CommitDiff> {
        let url = format!(
            "{}/projects/{}/repository/commits/{}/diff",
            self.base_api,
            urlencoding::encode(&commit.project),
            urlencoding::encode(&commit.sha)
        );
        debug!("GitLab fetch_commit_diff: {}", url);

        let diff: CommitDiff = self.get_json(url).await?;
        info!(
            project = %commit.project,
            sha = %commit.sha,
            files = diff.records.len(),
            "commit diff fetched"
        );
        Ok(diff)
    }

    /// Posts a general (non-inline) note on a merge request.
    pub async fn post_mr_note(&self, id: &ChangeRequestId, body: &str) -> GitContextEngineResult<()> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/notes",
            self.base_api,
            urlencoding::encode(&id.project),
            id.iid
        );
        debug!("GitLab post_mr_note: url={}, len={}", url, body.len());

        self.post_created(url, &NoteCreate { body }).await
    }

    /// Posts a comment on a commit.
    pub async fn post_commit_comment(
        &self,
        commit: &CommitRef,
        note: &str,
    ) -> GitContextEngineResult<()> {
        let url = format!(
            "{}/projects/{}/repository/commits/{}/comments",
            self.base_api,
            urlencoding::encode(&commit.project),
            urlencoding::encode(&commit.sha)
        );
        debug!("GitLab post_commit_comment: url={}, len={}", url, note.len());

        self.post_created(url, &CommitCommentCreate { note }).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> GitContextEngineResult<T> {
        let resp = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await
            .map_err(|e| from_transport(e, self.timeout))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            let detail = error_detail(&text);
            warn!(%url, %status, %detail, "GitLab read returned unexpected status");
            return Err(GitContextEngineError::UnexpectedStatus {
                status: status.as_u16(),
                expected: StatusCode::OK.as_u16(),
                url,
                detail,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| from_transport(e, self.timeout))
    }

    async fn post_created<B: Serialize>(&self, url: String, body: &B) -> GitContextEngineResult<()> {
        let resp = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| from_transport(e, self.timeout))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if status != StatusCode::CREATED {
            let detail = error_detail(&text);
            warn!(%url, %status, %detail, "GitLab write returned unexpected status");
            return Err(GitContextEngineError::UnexpectedStatus {
                status: status.as_u16(),
                expected: StatusCode::CREATED.as_u16(),
                url,
                detail,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(base: String) -> GitLabClient {
        GitLabClient::new(ProviderConfig {
            base_api: base,
            token: "glpat-test".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn mr() -> ChangeRequestId {
        ChangeRequestId {
            project: "1".into(),
            iid: 5,
        }
    }

    #[tokio::test]
    async fn fetches_mr_changes_with_private_token() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/projects/1/merge_requests/5/changes")
            .match_header("private-token", "glpat-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"changes":[{"diff":"+x"},{"diff":"+y"}]}"#)
            .create_async()
            .await;

        let changes = client(server.url()).fetch_mr_changes(&mr()).await.unwrap();
        assert_eq!(changes.concatenated_diff(), "+x+y");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_read_carries_upstream_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/1/merge_requests/5/changes")
            .with_status(404)
            .with_body(r#"{"message":"404 Not found"}"#)
            .create_async()
            .await;

        let err = client(server.url()).fetch_mr_changes(&mr()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().ends_with(": 404 Not found"));
    }

    #[tokio::test]
    async fn group_paths_are_url_encoded() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/projects/group%2Fproj/repository/commits/abc123/diff")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"new_path":"a.rs","diff":"+a"}]"#)
            .create_async()
            .await;

        let diff = client(server.url())
            .fetch_commit_diff(&CommitRef {
                project: "group/proj".into(),
                sha: "abc123".into(),
            })
            .await
            .unwrap();
        assert_eq!(diff.records.len(), 1);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn note_and_comment_bodies_use_gitlab_field_names() {
        let mut server = mockito::Server::new_async().await;
        let note = server
            .mock("POST", "/projects/1/merge_requests/5/notes")
            .match_body(Matcher::Json(json!({ "body": "review" })))
            .with_status(201)
            .create_async()
            .await;
        let comment = server
            .mock("POST", "/projects/1/repository/commits/abc/comments")
            .match_body(Matcher::Json(json!({ "note": "review" })))
            .with_status(201)
            .create_async()
            .await;

        let c = client(server.url());
        c.post_mr_note(&mr(), "review").await.unwrap();
        c.post_commit_comment(
            &CommitRef {
                project: "1".into(),
                sha: "abc".into(),
            },
            "review",
        )
        .await
        .unwrap();

        note.assert_async().await;
        comment.assert_async().await;
    }

    #[tokio::test]
    async fn write_answered_with_200_is_not_created() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/projects/1/merge_requests/5/notes")
            .with_status(200)
            .create_async()
            .await;

        let err = client(server.url()).post_mr_note(&mr(), "x").await.unwrap_err();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn constructor_validates_inputs() {
        assert!(
            GitLabClient::new(ProviderConfig {
                base_api: "gitlab.com/api/v4".into(),
                token: "t".into(),
                timeout_secs: 5,
            })
            .is_err()
        );
        assert!(
            GitLabClient::new(ProviderConfig {
                base_api: "https://gitlab.com/api/v4".into(),
                token: " ".into(),
                timeout_secs: 5,
            })
            .is_err()
        );
    }
}
