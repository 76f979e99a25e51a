//! Data model for the GitLab objects a review touches: merge request
//! changes, commit diffs and the references that address them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unique reference to a merge request inside GitLab.
///
/// * `project` – numeric ID or "group/project".
/// * `iid`     – project-scoped merge request IID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestId {
    pub project: String,
    pub iid: u64,
}

/// A commit inside a GitLab project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub project: String,
    pub sha: String,
}

/// Body of `GET /projects/:id/merge_requests/:iid/changes` (subset).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MrChanges {
    #[serde(default)]
    pub changes: Vec<MrFileChange>,
}

/// One file entry of an MR change set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MrFileChange {
    /// Unified diff text; empty for binary or collapsed files.
    #[serde(default)]
    pub diff: String,
}

impl MrChanges {
    /// Per-file diff fragments, in the order GitLab returned them.
    pub fn diff_fragments(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.diff.as_str())
    }

    /// All fragments concatenated with no separator.
    pub fn concatenated_diff(&self) -> String {
        self.diff_fragments().collect()
    }
}

/// Body of `GET /projects/:id/repository/commits/:sha/diff`.
///
/// Records are kept untyped: the whole record (paths, flags and diff) is
/// handed to the reviewer, not only the `diff` field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CommitDiff {
    pub records: Vec<Value>,
}

impl CommitDiff {
    /// Serializes every record to compact JSON and concatenates them.
    pub fn to_text(&self) -> String {
        self.records
            .iter()
            .map(|r| serde_json::to_string(r).unwrap_or_else(|_| r.to_string()))
            .collect()
    }
}

/// Body of `POST /projects/:id/merge_requests/:iid/notes`.
#[derive(Debug, Serialize)]
pub struct NoteCreate<'a> {
    pub body: &'a str,
}

/// Body of `POST /projects/:id/repository/commits/:sha/comments`.
#[derive(Debug, Serialize)]
pub struct CommitCommentCreate<'a> {
    pub note: &'a str,
}
