//! Octocrab implementation of [`GitProvider`].

use async_trait::async_trait;
use octocrab::models::repos::Content;
use octocrab::{Octocrab, Page};
use serde_json::json;

use crate::error::ToolError;
use crate::github::diff::{DiffDocument, annotate_files};
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{
    ApiComment, ApiCommit, ApiPullRequest, ApiPullRequestFile, ChangedFile, PullRequestMetadata,
};

use super::GitProvider;
use super::client::build_octocrab_client;
use super::error_mapping::{is_not_found, map_octocrab_error};

/// Octocrab-backed provider bound to a single pull request.
pub struct OctocrabGitProvider {
    client: Octocrab,
    locator: PullRequestLocator,
}

impl OctocrabGitProvider {
    /// Creates a provider from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, locator: PullRequestLocator) -> Self {
        Self { client, locator }
    }

    /// Builds an Octocrab client for the given token and pull request.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::InvalidUrl` when the base URI cannot be parsed or
    /// `ToolError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &PullRequestLocator,
    ) -> Result<Self, ToolError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab, locator.clone()))
    }
}

#[async_trait]
impl GitProvider for OctocrabGitProvider {
    async fn pull_request(&self) -> Result<PullRequestMetadata, ToolError> {
        self.client
            .get::<ApiPullRequest, _, _>(self.locator.pull_request_path(), None::<&()>)
            .await
            .map(ApiPullRequest::into)
            .map_err(|error| map_octocrab_error("pull request", &error))
    }

    async fn commit_messages(&self) -> Result<String, ToolError> {
        let page = self
            .client
            .get::<Page<ApiCommit>, _, _>(self.locator.commits_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request commits", &error))?;

        let commits = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("pull request commits", &error))?;

        let messages: Vec<String> = commits
            .into_iter()
            .map(|commit| commit.commit.message)
            .collect();
        Ok(messages.join("\n"))
    }

    async fn changed_files(&self) -> Result<Vec<ChangedFile>, ToolError> {
        let page = self
            .client
            .get::<Page<ApiPullRequestFile>, _, _>(self.locator.files_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request files", &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|files| files.into_iter().map(ApiPullRequestFile::into).collect())
            .map_err(|error| map_octocrab_error("pull request files", &error))
    }

    async fn diff(&self) -> Result<DiffDocument, ToolError> {
        let files = self.changed_files().await?;
        Ok(annotate_files(&files))
    }

    async fn file_content(&self, path: &str, git_ref: &str) -> Result<Option<String>, ToolError> {
        let result = self
            .client
            .repos(
                self.locator.owner().as_str(),
                self.locator.repository().as_str(),
            )
            .get_content()
            .path(path)
            .r#ref(git_ref)
            .send()
            .await;

        match result {
            Ok(items) => Ok(items.items.first().and_then(Content::decoded_content)),
            Err(error) if is_not_found(&error) => Ok(None),
            Err(error) => Err(map_octocrab_error("file content", &error)),
        }
    }

    async fn publish_comment(&self, body: &str) -> Result<(), ToolError> {
        let payload = json!({ "body": body });
        let comment: ApiComment = self
            .client
            .post(self.locator.comments_path(), Some(&payload))
            .await
            .map_err(|error| map_octocrab_error("publish comment", &error))?;

        tracing::debug!("published comment {} on {}", comment.id, self.locator.comments_path());
        Ok(())
    }
}
