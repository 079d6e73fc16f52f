//! GitHub pull request access.
//!
//! This module wraps Octocrab to parse pull request URLs, read commits,
//! files and metadata, render the line-numbered diff and publish comments.
//! Errors are mapped into [`ToolError`](crate::ToolError) variants so that
//! callers can surface precise failures without exposing Octocrab internals.

pub mod diff;
pub mod gateway;
pub mod locator;
pub mod models;

pub use diff::DiffDocument;
pub use gateway::{GitProvider, OctocrabGitProvider};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::{ChangedFile, PullRequestMetadata};

#[cfg(test)]
pub use gateway::MockGitProvider;
