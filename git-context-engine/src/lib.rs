//! GitLab access for the review bridge: read what changed, write the review back.

pub mod errors;
pub mod git_providers;

pub use errors::{GitContextEngineError, GitContextEngineResult};
pub use git_providers::gitlab::GitLabClient;
pub use git_providers::{ChangeRequestId, CommitDiff, CommitRef, MrChanges, ProviderConfig};
