use ai_llm_service::{
    AiLlmError, LlmModelConfig, config::default_config::config_openai_from,
};
use git_context_engine::{GitContextEngineError, ProviderConfig};
use thiserror::Error;
use tracing::info;

/// Variables that must be present (and non-blank) for the process to start.
pub const REQUIRED_VARS: [&str; 4] = [
    "OPENAI_API_KEY",
    "GITLAB_TOKEN",
    "GITLAB_URL",
    "EXPECTED_GITLAB_TOKEN",
];

const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_GITLAB_TIMEOUT_SECS: u64 = 30;

/// Startup configuration errors. Any of these ends the process with status 1.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),

    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error("GitLab client setup failed: {0}")]
    GitLab(#[from] GitContextEngineError),
}

/// Explicit configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:8080".
    pub listen_addr: String,
    /// GitLab API base, token and per-call timeout.
    pub gitlab: ProviderConfig,
    /// Shared secret expected in `X-Gitlab-Token`.
    pub webhook_secret: String,
    /// Completion model used for reviews.
    pub llm: LlmModelConfig,
    /// Whether an alternate (Azure) deployment base was configured.
    pub azure_configured: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    ///
    /// All missing required variables are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let llm = config_openai_from(&lookup)?;

        let gitlab_timeout = match get("GITLAB_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: "GITLAB_TIMEOUT_SECS",
                reason: "expected u64",
            })?,
            None => DEFAULT_GITLAB_TIMEOUT_SECS,
        };

        let cfg = Self {
            listen_addr: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            gitlab: ProviderConfig {
                base_api: get("GITLAB_URL").unwrap_or_default(),
                token: get("GITLAB_TOKEN").unwrap_or_default(),
                timeout_secs: gitlab_timeout,
            },
            webhook_secret: get("EXPECTED_GITLAB_TOKEN").unwrap_or_default(),
            llm,
            azure_configured: get("AZURE_OPENAI_API_BASE").is_some(),
        };

        info!(
            listen_addr = %cfg.listen_addr,
            gitlab_url = %cfg.gitlab.base_api,
            gitlab_timeout_secs = cfg.gitlab.timeout_secs,
            gitlab_token_set = !cfg.gitlab.token.is_empty(),
            webhook_secret_set = !cfg.webhook_secret.is_empty(),
            model = %cfg.llm.model,
            azure = cfg.azure_configured,
            "configuration loaded"
        );

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(move |k| map.get(k).cloned())
    }

    const FULL: [(&str, &str); 4] = [
        ("OPENAI_API_KEY", "sk"),
        ("GITLAB_TOKEN", "glpat"),
        ("GITLAB_URL", "https://gitlab.example.com/api/v4"),
        ("EXPECTED_GITLAB_TOKEN", "secret"),
    ];

    #[test]
    fn all_missing_vars_are_listed() {
        let err = load(&[("GITLAB_TOKEN", "x")]).unwrap_err();
        match err {
            ConfigError::MissingVars(v) => {
                assert_eq!(v, vec!["OPENAI_API_KEY", "GITLAB_URL", "EXPECTED_GITLAB_TOKEN"])
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn blank_required_var_counts_as_missing() {
        let mut pairs = FULL.to_vec();
        pairs[3] = ("EXPECTED_GITLAB_TOKEN", "  ");
        let err = load(&pairs).unwrap_err();
        assert!(err.to_string().contains("EXPECTED_GITLAB_TOKEN"));
    }

    #[test]
    fn defaults_fill_optional_values() {
        let cfg = load(&FULL).unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.gitlab.timeout_secs, 30);
        assert_eq!(cfg.webhook_secret, "secret");
        assert!(!cfg.azure_configured);
        assert_eq!(cfg.llm.model, "gpt-3.5-turbo");
    }

    #[test]
    fn invalid_gitlab_timeout_is_rejected() {
        let mut pairs = FULL.to_vec();
        pairs.push(("GITLAB_TIMEOUT_SECS", "-1"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::InvalidNumber {
                var: "GITLAB_TIMEOUT_SECS",
                ..
            })
        ));
    }
}
