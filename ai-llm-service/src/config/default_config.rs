//! Completion model config loaded from environment variables.
//!
//! # Environment variables
//!
//! Required:
//! - `OPENAI_API_KEY`            = API key for the provider
//!
//! Optional:
//! - `OPENAI_API_MODEL`          = model / deployment name (default `gpt-3.5-turbo`)
//! - `OPENAI_API_BASE`           = API base (default `https://api.openai.com/v1`)
//! - `AZURE_OPENAI_API_BASE`     = alternate deployment base (wins over `OPENAI_API_BASE`)
//! - `AZURE_OPENAI_API_VERSION`  = switches the client to Azure addressing
//! - `LLM_TEMPERATURE`           = sampling temperature, `0.0..=2.0` (default `0.7`)
//! - `LLM_MAX_TOKENS`            = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`          = request timeout (default `120`)

use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, must_var, non_empty, opt_f32, opt_u32, opt_u64,
        validate_http_endpoint, validate_range_f32,
    },
};

/// Model used when `OPENAI_API_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// API base used when neither `AZURE_OPENAI_API_BASE` nor `OPENAI_API_BASE` is set.
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Sampling temperature applied to every review request unless overridden.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Request timeout applied unless `LLM_TIMEOUT_SECS` is set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Constructs the completion config from an arbitrary variable source.
///
/// Azure addressing is selected when `AZURE_OPENAI_API_VERSION` is present;
/// in that case `AZURE_OPENAI_API_BASE` becomes mandatory.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] for a missing key (or Azure base)
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad knobs
/// - [`ConfigError::InvalidFormat`] if the base URL has no http(s) scheme
pub fn config_openai_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(&lookup, "OPENAI_API_KEY")?;

    let model = non_empty(&lookup, "OPENAI_API_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());

    let azure_base = non_empty(&lookup, "AZURE_OPENAI_API_BASE");
    let api_version = non_empty(&lookup, "AZURE_OPENAI_API_VERSION");

    let (provider, endpoint, endpoint_var) = match (&api_version, azure_base) {
        (Some(_), Some(base)) => (LlmProvider::AzureOpenAI, base, "AZURE_OPENAI_API_BASE"),
        (Some(_), None) => {
            return Err(ConfigError::MissingVar("AZURE_OPENAI_API_BASE").into());
        }
        (None, Some(base)) => (LlmProvider::OpenAI, base, "AZURE_OPENAI_API_BASE"),
        (None, None) => (
            LlmProvider::OpenAI,
            non_empty(&lookup, "OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_OPENAI_BASE.into()),
            "OPENAI_API_BASE",
        ),
    };
    validate_http_endpoint(endpoint_var, endpoint.trim())?;

    let temperature = opt_f32(&lookup, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("LLM_TEMPERATURE", temperature, 0.0, 2.0)?;

    let max_tokens = opt_u32(&lookup, "LLM_MAX_TOKENS")?;
    let timeout_secs = opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    info!(
        provider = ?provider,
        model = %model,
        endpoint = %endpoint,
        api_version = api_version.as_deref().unwrap_or("n/a"),
        temperature,
        timeout_secs,
        "completion model configured"
    );

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint.trim().to_string(),
        api_key,
        api_version,
        max_tokens,
        temperature: Some(temperature),
        timeout_secs: Some(timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Result<LlmModelConfig, AiLlmError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_openai_from(move |k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let c = cfg(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(c.provider, LlmProvider::OpenAI);
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.endpoint, DEFAULT_OPENAI_BASE);
        assert_eq!(c.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(c.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(c.api_version, None);
    }

    #[test]
    fn missing_key_is_reported() {
        let err = cfg(&[]).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn azure_version_switches_provider() {
        let c = cfg(&[
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_API_MODEL", "reviewer"),
            ("AZURE_OPENAI_API_BASE", "https://acme.openai.azure.com"),
            ("AZURE_OPENAI_API_VERSION", "2024-02-01"),
        ])
        .unwrap();
        assert_eq!(c.provider, LlmProvider::AzureOpenAI);
        assert_eq!(c.endpoint, "https://acme.openai.azure.com");
        assert_eq!(c.api_version.as_deref(), Some("2024-02-01"));
        assert_eq!(c.model, "reviewer");
    }

    #[test]
    fn azure_version_without_base_is_rejected() {
        let err = cfg(&[
            ("OPENAI_API_KEY", "k"),
            ("AZURE_OPENAI_API_VERSION", "2024-02-01"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("AZURE_OPENAI_API_BASE"))
        ));
    }

    #[test]
    fn azure_base_alone_overrides_openai_base() {
        let c = cfg(&[
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_API_BASE", "https://api.groq.com/openai/v1"),
            ("AZURE_OPENAI_API_BASE", "https://proxy.internal/v1"),
        ])
        .unwrap();
        assert_eq!(c.provider, LlmProvider::OpenAI);
        assert_eq!(c.endpoint, "https://proxy.internal/v1");
    }

    #[test]
    fn bad_knobs_fail_fast() {
        assert!(cfg(&[("OPENAI_API_KEY", "k"), ("LLM_TEMPERATURE", "3.5")]).is_err());
        assert!(cfg(&[("OPENAI_API_KEY", "k"), ("LLM_TIMEOUT_SECS", "soon")]).is_err());
        assert!(cfg(&[("OPENAI_API_KEY", "k"), ("OPENAI_API_BASE", "api.openai.com")]).is_err());
    }
}
