use crate::config::llm_provider::LlmProvider;

/// Configuration for the completion model used to write reviews.
///
/// # Fields
///
/// - `provider`: Which API flavour to address (OpenAI-compatible or Azure).
/// - `model`: The model identifier (also the Azure deployment name).
/// - `endpoint`: API base URL, e.g. `https://api.openai.com/v1`.
/// - `api_key`: API key sent as Bearer token or `api-key` header.
/// - `api_version`: Azure `api-version` query value (Azure only).
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `timeout_secs`: Request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-3.5-turbo".to_string(),
///     endpoint: "https://api.openai.com/v1".to_string(),
///     api_key: "sk-...".to_string(),
///     api_version: None,
///     max_tokens: None,
///     temperature: Some(0.7),
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.provider, LlmProvider::OpenAI);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The API flavour.
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-3.5-turbo"`).
    pub model: String,

    /// API base URL without a trailing `/chat/completions`.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: String,

    /// Azure `api-version`; `None` for OpenAI-compatible APIs.
    pub api_version: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
