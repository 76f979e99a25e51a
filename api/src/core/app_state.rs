use git_context_engine::GitLabClient;

use crate::{
    core::app_config::{AppConfig, ConfigError},
    review::review_client::ReviewClient,
};

/// Shared state for all HTTP handlers.
///
/// Holds read-only configuration and the two outbound clients; nothing in
/// here is mutated after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Source-control client (GitLab REST v4).
    pub gitlab: GitLabClient,
    /// Review-generation client; never fails from the caller's view.
    pub reviewer: ReviewClient,
}

impl AppState {
    /// Builds both outbound clients from the configuration.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let gitlab = GitLabClient::new(config.gitlab.clone())?;
        let reviewer = ReviewClient::new(config.llm.clone())?;
        Ok(Self {
            config,
            gitlab,
            reviewer,
        })
    }
}
