//! Sends sample GitLab deliveries to a running instance.
//!
//! `WEBHOOK_BASE_URL` (default `http://localhost:8080`) selects the
//! instance; `EXPECTED_GITLAB_TOKEN` (default `test-token-123`) must match
//! the server's secret.

use std::process::ExitCode;

use api::telemetry;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{error, info, warn};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TOKEN: &str = "test-token-123";

struct Target {
    http: Client,
    base: String,
    token: String,
}

impl Target {
    async fn health(&self) -> Result<StatusCode, reqwest::Error> {
        let resp = self.http.get(format!("{}/health", self.base)).send().await?;
        let status = resp.status();
        info!(%status, body = %resp.text().await.unwrap_or_default(), "health");
        Ok(status)
    }

    async fn deliver(&self, token: &str, payload: &Value) -> Result<StatusCode, reqwest::Error> {
        let resp = self
            .http
            .post(format!("{}/webhook", self.base))
            .header("X-Gitlab-Token", token)
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        let comment = resp
            .headers()
            .get("x-review-comment")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        info!(%status, ?comment, body = %resp.text().await.unwrap_or_default(), "webhook");
        Ok(status)
    }
}

fn merge_request_payload() -> Value {
    json!({
        "object_kind": "merge_request",
        "object_attributes": {
            "action": "open",
            "iid": 123,
            "title": "Test MR",
            "description": "MR de prueba"
        },
        "project": { "id": 1, "name": "test-project" }
    })
}

fn push_payload() -> Value {
    json!({
        "object_kind": "push",
        "project_id": 1,
        "after": "abc123def456",
        "project": { "name": "test-project" }
    })
}

fn check(name: &str, outcome: Result<StatusCode, reqwest::Error>, want: StatusCode) -> bool {
    match outcome {
        Ok(status) if status == want => {
            info!(check = name, "passed");
            true
        }
        Ok(status) => {
            warn!(check = name, %status, expected = %want, "failed");
            false
        }
        Err(e) => {
            warn!(check = name, error = %e, "request failed");
            false
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    if let Err(e) = telemetry::init(None) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let http = match Client::builder().build() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "cannot build HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let target = Target {
        http,
        base: std::env::var("WEBHOOK_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string(),
        token: std::env::var("EXPECTED_GITLAB_TOKEN").unwrap_or_else(|_| DEFAULT_TOKEN.into()),
    };
    info!(base = %target.base, "probing review bridge");

    if !check("health", target.health().await, StatusCode::OK) {
        error!("instance is not running or its configuration is incomplete");
        return ExitCode::FAILURE;
    }

    let results = [
        check(
            "invalid token",
            target
                .deliver("invalid-token", &json!({ "object_kind": "merge_request" }))
                .await,
            StatusCode::FORBIDDEN,
        ),
        check(
            "merge request",
            target.deliver(&target.token, &merge_request_payload()).await,
            StatusCode::OK,
        ),
        check(
            "push",
            target.deliver(&target.token, &push_payload()).await,
            StatusCode::OK,
        ),
    ];

    let passed = results.iter().filter(|ok| **ok).count() + 1;
    info!(passed, total = results.len() + 1, "done");
    if passed == results.len() + 1 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
