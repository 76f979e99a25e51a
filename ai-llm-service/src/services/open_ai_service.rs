//! OpenAI-compatible chat completion client.
//!
//! Minimal, non-streaming client around the chat completions REST API.
//! The request URL is derived from `LlmModelConfig`:
//! - OpenAI-compatible: POST {endpoint}/chat/completions (Bearer auth)
//! - Azure OpenAI: POST {endpoint}/openai/deployments/{model}/chat/completions?api-version={v}
//!   (`api-key` header)
//!
//! Constructor validation:
//! - `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//! - Azure configs must carry an `api_version`
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    chat::{ChatMessage, Role, flatten_messages},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, HttpError, make_snippet},
};

/// Thin client for an OpenAI-compatible chat completions API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug, Clone)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

/// Per-call generation knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerateOptions {
    /// Options taken from the model config.
    pub fn from_cfg(cfg: &LlmModelConfig) -> Self {
        Self {
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Generated text plus optional usage metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] if the key, endpoint or Azure version is unusable
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY").into());
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidFormat {
                var: "OPENAI_API_BASE",
                reason: "must start with http:// or https://",
            }
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(120));

        let mut headers = header::HeaderMap::new();
        let key_header = match cfg.provider {
            LlmProvider::OpenAI => (header::AUTHORIZATION, format!("Bearer {}", cfg.api_key)),
            LlmProvider::AzureOpenAI => (
                header::HeaderName::from_static("api-key"),
                cfg.api_key.clone(),
            ),
        };
        headers.insert(
            key_header.0,
            header::HeaderValue::from_str(&key_header.1)
                .map_err(|e| AiLlmError::Decode(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/');
        let url_chat = match cfg.provider {
            LlmProvider::OpenAI => format!("{base}/chat/completions"),
            LlmProvider::AzureOpenAI => {
                let version = cfg
                    .api_version
                    .as_deref()
                    .ok_or(ConfigError::MissingVar("AZURE_OPENAI_API_VERSION"))?;
                format!(
                    "{base}/openai/deployments/{}/chat/completions?api-version={version}",
                    cfg.model
                )
            }
        };

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    /// Model config this client was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// `messages` are flattened into a single user input (see
    /// [`flatten_messages`]); `stream` is always `false`.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::Timeout`] when the configured timeout elapses
    /// - [`AiLlmError::HttpTransport`] for other client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    /// - [`AiLlmError::EmptyChoices`] if no choice carries content
    pub async fn generate(
        &self,
        messages: &[ChatMessage],
        opts: &GenerateOptions,
    ) -> Result<Completion, AiLlmError> {
        let started = Instant::now();
        let input = flatten_messages(messages);
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages: vec![WireMessage {
                role: Role::User,
                content: &input,
            }],
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
            stream: false,
        };

        debug!(
            model = %self.cfg.model,
            input_len = input.len(),
            message_count = messages.len(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(HttpError {
                status,
                url,
                snippet,
            }
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) if e.is_timeout() => return Err(AiLlmError::Timeout(self.timeout)),
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(AiLlmError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                )));
            }
        };

        let text = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or(AiLlmError::EmptyChoices)?;

        match out.usage {
            Some(u) => info!(
                model = %self.cfg.model,
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                latency_ms = started.elapsed().as_millis(),
                "chat completion completed"
            ),
            None => info!(
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion completed (no usage reported)"
            ),
        }

        Ok(Completion {
            text,
            usage: out.usage,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> AiLlmError {
        if e.is_timeout() {
            error!(model = %self.cfg.model, timeout = ?self.timeout, "chat completion timed out");
            AiLlmError::Timeout(self.timeout)
        } else {
            error!(model = %self.cfg.model, error = %e, "chat completion transport failure");
            AiLlmError::HttpTransport(e)
        }
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "test-model".into(),
            endpoint,
            api_key: "sk-test".into(),
            api_version: None,
            max_tokens: None,
            temperature: Some(0.7),
            timeout_secs: Some(5),
        }
    }

    fn prompt() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("persona"),
            ChatMessage::user("diff"),
            ChatMessage::assistant("markdown"),
        ]
    }

    #[tokio::test]
    async fn generate_sends_flattened_input_and_returns_trimmed_text() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "test-model",
                "stream": false,
                "messages": [{ "role": "user", "content": "persona\n\ndiff\n\nmarkdown" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "content": "  LGTM \n" } }],
                    "usage": { "prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(server.url())).unwrap();
        let out = svc
            .generate(&prompt(), &GenerateOptions::from_cfg(svc.config()))
            .await
            .unwrap();

        assert_eq!(out.text, "LGTM");
        assert_eq!(out.usage.map(|u| u.total_tokens), Some(12));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_snippet() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limit exceeded")
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(server.url())).unwrap();
        let err = svc
            .generate(&prompt(), &GenerateOptions::default())
            .await
            .unwrap_err();

        match err {
            AiLlmError::HttpStatus(h) => {
                assert_eq!(h.status.as_u16(), 429);
                assert_eq!(h.snippet, "rate limit exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let svc = OpenAiService::new(cfg(server.url())).unwrap();
        let err = svc
            .generate(&prompt(), &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AiLlmError::EmptyChoices));
    }

    #[tokio::test]
    async fn azure_addresses_the_deployment_with_api_key_header() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/openai/deployments/test-model/chat/completions")
            .match_query(Matcher::UrlEncoded(
                "api-version".into(),
                "2024-02-01".into(),
            ))
            .match_header("api-key", "sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let mut c = cfg(server.url());
        c.provider = LlmProvider::AzureOpenAI;
        c.api_version = Some("2024-02-01".into());

        let svc = OpenAiService::new(c).unwrap();
        let out = svc
            .generate(&prompt(), &GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(out.text, "ok");
        assert_eq!(out.usage, None);
        m.assert_async().await;
    }

    #[test]
    fn constructor_rejects_bad_endpoint() {
        let err = OpenAiService::new(cfg("ftp://nope".into())).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::InvalidFormat { .. })
        ));
    }
}
