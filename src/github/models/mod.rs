//! Data models representing pull request metadata, commits and files.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types.

use serde::Deserialize;

/// Pull request metadata consumed by the review tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestMetadata {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// Description (body) of the pull request.
    pub description: Option<String>,
    /// Name of the head branch.
    pub head_ref: Option<String>,
}

/// A file touched by the pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFile {
    /// Path of the file in the head revision.
    pub filename: String,
    /// Change status reported by GitHub (e.g. `added`, `modified`).
    pub status: Option<String>,
    /// Unified diff patch; absent for binary or oversized files.
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) head: Option<ApiBranchRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranchRef {
    #[serde(rename = "ref")]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommit {
    pub(crate) commit: ApiCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitDetail {
    pub(crate) message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestFile {
    pub(crate) filename: String,
    pub(crate) status: Option<String>,
    pub(crate) patch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) id: u64,
}

impl From<ApiPullRequest> for PullRequestMetadata {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            description: value.body,
            head_ref: value.head.and_then(|head| head.name),
        }
    }
}

impl From<ApiPullRequestFile> for ChangedFile {
    fn from(value: ApiPullRequestFile) -> Self {
        Self {
            filename: value.filename,
            status: value.status,
            patch: value.patch,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiCommit, ApiPullRequest, PullRequestMetadata};

    #[test]
    fn api_pull_request_converts_head_ref_and_body() {
        let value = json!({
            "number": 7,
            "title": "Fix crash",
            "body": "Closes core: 12:",
            "head": { "ref": "feature/fix-crash" }
        });

        let api: ApiPullRequest =
            serde_json::from_value(value).expect("ApiPullRequest should deserialize");
        let metadata: PullRequestMetadata = api.into();

        assert_eq!(metadata.number, 7);
        assert_eq!(metadata.title.as_deref(), Some("Fix crash"));
        assert_eq!(metadata.description.as_deref(), Some("Closes core: 12:"));
        assert_eq!(metadata.head_ref.as_deref(), Some("feature/fix-crash"));
    }

    #[test]
    fn api_commit_reads_nested_message() {
        let value = json!({
            "sha": "abc123",
            "commit": { "message": "core: 12: fix crash", "author": { "name": "a" } }
        });

        let api: ApiCommit = serde_json::from_value(value).expect("ApiCommit should deserialize");

        assert_eq!(api.commit.message, "core: 12: fix crash");
    }
}
