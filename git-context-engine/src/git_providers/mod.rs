//! Source-control provider access.
//!
//! Only GitLab is wired in: it is the provider that delivers the webhooks
//! this service reacts to, and the one review comments are posted back to.

pub mod types;
pub use types::*;

pub mod gitlab;

/// Runtime configuration for the provider client.
///
/// This configuration is usually injected from environment or higher-level
/// application settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://gitlab.com/api/v4".
    pub base_api: String,
    /// Access token sent as `PRIVATE-TOKEN`.
    pub token: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}
