//! In-memory collaborators for integration tests.
//!
//! [`RecordingGitProvider`] serves a fixed pull request and records every
//! published comment; [`StubChatCompletion`] answers every request with the
//! same text and records the requests.
//!
//! ```
//! use verity::test_support::RecordingGitProvider;
//!
//! let provider = RecordingGitProvider::new()
//!     .with_commit_messages("core: 123: fix bug")
//!     .with_diff("11 +fixed();");
//! assert!(provider.published().is_empty());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ai::{ChatCompletion, ChatCompletionRequest, ChatCompletionService};
use crate::error::ToolError;
use crate::github::{ChangedFile, DiffDocument, GitProvider, PullRequestMetadata};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Git provider backed by fixed data.
#[derive(Debug, Default)]
pub struct RecordingGitProvider {
    metadata: PullRequestMetadata,
    commit_messages: String,
    diff: DiffDocument,
    files: Vec<ChangedFile>,
    contents: HashMap<String, String>,
    published: Mutex<Vec<String>>,
    diff_calls: AtomicUsize,
}

impl RecordingGitProvider {
    /// Creates a provider for an empty pull request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pull request metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: PullRequestMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the newline-joined commit messages.
    #[must_use]
    pub fn with_commit_messages(mut self, messages: impl Into<String>) -> Self {
        self.commit_messages = messages.into();
        self
    }

    /// Sets the annotated diff.
    #[must_use]
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = DiffDocument::new(diff);
        self
    }

    /// Adds a changed file.
    #[must_use]
    pub fn with_file(mut self, file: ChangedFile) -> Self {
        self.files.push(file);
        self
    }

    /// Adds repository file contents served for any git ref.
    #[must_use]
    pub fn with_content(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.contents.insert(path.into(), content.into());
        self
    }

    /// Comments published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<String> {
        lock(&self.published).clone()
    }

    /// Number of times the diff was requested.
    #[must_use]
    pub fn diff_calls(&self) -> usize {
        self.diff_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitProvider for RecordingGitProvider {
    async fn pull_request(&self) -> Result<PullRequestMetadata, ToolError> {
        Ok(self.metadata.clone())
    }

    async fn commit_messages(&self) -> Result<String, ToolError> {
        Ok(self.commit_messages.clone())
    }

    async fn changed_files(&self) -> Result<Vec<ChangedFile>, ToolError> {
        Ok(self.files.clone())
    }

    async fn diff(&self) -> Result<DiffDocument, ToolError> {
        self.diff_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.diff.clone())
    }

    async fn file_content(&self, path: &str, _git_ref: &str) -> Result<Option<String>, ToolError> {
        Ok(self.contents.get(path).cloned())
    }

    async fn publish_comment(&self, body: &str) -> Result<(), ToolError> {
        lock(&self.published).push(body.to_owned());
        Ok(())
    }
}

/// Chat-completion service returning a fixed reply.
#[derive(Debug, Default)]
pub struct StubChatCompletion {
    reply: String,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl StubChatCompletion {
    /// Creates a stub answering every request with `reply`.
    #[must_use]
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::default(),
        }
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ChatCompletionService for StubChatCompletion {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, ToolError> {
        lock(&self.requests).push(request.clone());
        Ok(ChatCompletion {
            text: self.reply.clone(),
            finish_reason: Some("stop".to_owned()),
        })
    }
}
