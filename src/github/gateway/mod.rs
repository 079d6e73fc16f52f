//! Git host access for the review tools.
//!
//! [`GitProvider`] is the narrow contract the tools need from a git host:
//! pull request metadata, commit messages, the annotated diff, repository
//! file contents and comment publishing. [`OctocrabGitProvider`] implements
//! it against the GitHub REST API.

mod client;
mod error_mapping;
mod provider;

pub use provider::OctocrabGitProvider;

use async_trait::async_trait;

use crate::error::ToolError;
use crate::github::diff::DiffDocument;
use crate::github::models::{ChangedFile, PullRequestMetadata};

/// Pull-request scoped operations on a git host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitProvider: Send + Sync {
    /// Fetch the pull request metadata.
    async fn pull_request(&self) -> Result<PullRequestMetadata, ToolError>;

    /// Fetch every commit message of the pull request, newline-joined with
    /// the most recent commit last.
    async fn commit_messages(&self) -> Result<String, ToolError>;

    /// List the files changed by the pull request.
    async fn changed_files(&self) -> Result<Vec<ChangedFile>, ToolError>;

    /// Fetch the pull request diff with line-numbered hunks.
    async fn diff(&self) -> Result<DiffDocument, ToolError>;

    /// Read a repository file at `git_ref`, returning `None` when it does
    /// not exist.
    async fn file_content(&self, path: &str, git_ref: &str) -> Result<Option<String>, ToolError>;

    /// Publish a comment on the pull request conversation.
    async fn publish_comment(&self, body: &str) -> Result<(), ToolError>;
}
