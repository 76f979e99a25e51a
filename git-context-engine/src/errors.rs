//! Crate-wide error hierarchy for git-context-engine.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitContextEngineResult<T> = Result<T, GitContextEngineError>;

/// Root error type for the git-context-engine crate.
#[derive(Debug, Error)]
pub enum GitContextEngineError {
    /// GitLab answered with a status other than the one the call expects
    /// (200 for reads, 201 for note/comment creation).
    #[error("unexpected status {status} from {url} (expected {expected}): {detail}")]
    UnexpectedStatus {
        status: u16,
        expected: u16,
        url: String,
        detail: String,
    },

    /// The per-call timeout elapsed before GitLab answered.
    #[error("request to GitLab timed out after {0:?}")]
    Timeout(Duration),

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of GitLab response.
    #[error("invalid provider response: {0}")]
    Decode(String),

    /// Configuration problems (bad/missing tokens, base URL, etc.).
    #[error(transparent)]
    Config(#[from] GitContextEngineConfigError),
}

impl GitContextEngineError {
    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration and setup errors (base API URL, missing token, etc.).
#[derive(Debug, Error)]
pub enum GitContextEngineConfigError {
    /// Missing required provider access token.
    #[error("missing GitLab token")]
    MissingToken,

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    Client(String),
}

/// Maps a transport-level `reqwest::Error` into the crate error, keeping
/// timeouts distinguishable.
pub(crate) fn from_transport(e: reqwest::Error, timeout: Duration) -> GitContextEngineError {
    if e.is_timeout() {
        GitContextEngineError::Timeout(timeout)
    } else if e.is_decode() {
        GitContextEngineError::Decode(e.to_string())
    } else {
        GitContextEngineError::Network(e.to_string())
    }
}

const DETAIL_MAX: usize = 200;

/// Extracts the readable part of a GitLab error body.
///
/// GitLab answers with `{"message": ...}` (a string, or a map of field
/// errors on validation failures) or OAuth-style
/// `{"error": ..., "error_description": ...}`. Non-JSON bodies are kept as
/// single-line text. The result is capped at [`DETAIL_MAX`] characters.
pub(crate) fn error_detail(body: &str) -> String {
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(v) => v
            .get("message")
            .or_else(|| v.get("error_description"))
            .or_else(|| v.get("error"))
            .map(|m| match m {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| v.to_string()),
        Err(_) => body.split_whitespace().collect::<Vec<_>>().join(" "),
    };

    let mut out: String = detail.chars().take(DETAIL_MAX).collect();
    if out.len() < detail.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gitlab_message_is_extracted() {
        assert_eq!(
            error_detail(r#"{"message":"404 Project Not Found"}"#),
            "404 Project Not Found"
        );
        assert_eq!(
            error_detail(r#"{"message":{"note":["can't be blank"]}}"#),
            r#"{"note":["can't be blank"]}"#
        );
        assert_eq!(
            error_detail(r#"{"error":"invalid_token","error_description":"Token was revoked"}"#),
            "Token was revoked"
        );
    }

    #[test]
    fn plain_bodies_are_flattened_and_capped() {
        assert_eq!(error_detail("<html>\n  Bad   Gateway</html>"), "<html> Bad Gateway</html>");
        let long = "x".repeat(500);
        let d = error_detail(&long);
        assert_eq!(d.chars().count(), DETAIL_MAX + 1);
        assert!(d.ends_with('…'));
        assert_eq!(error_detail(""), "");
    }
}
