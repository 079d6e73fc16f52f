//! Shared steps of the prompt-driven review tools.

use serde::Serialize;

use crate::ai::{ChatCompletionRequest, ChatCompletionService, PromptTemplate, RenderedPrompt};
use crate::error::ToolError;
use crate::github::diff::annotate_files;
use crate::github::{ChangedFile, DiffDocument, GitProvider};

/// Settings shared by the review tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSettings {
    /// Chat-completion model.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Publishes progress and the prediction as comments.
    pub publish_output: bool,
}

/// Fixed prompt material of one review tool.
pub(super) struct ReviewPrompt {
    pub(super) name: &'static str,
    pub(super) override_path: &'static str,
    pub(super) system: &'static str,
    pub(super) default_user: &'static str,
    pub(super) preparing_message: Option<&'static str>,
}

/// Changed files of the pull request and the diff annotated from them.
pub(super) struct ReviewScope {
    pub(super) files: Vec<ChangedFile>,
    pub(super) diff: DiffDocument,
}

pub(super) struct ReviewPipeline<'a> {
    provider: &'a dyn GitProvider,
    service: &'a dyn ChatCompletionService,
    settings: &'a ReviewSettings,
    prompt: &'a ReviewPrompt,
}

impl<'a> ReviewPipeline<'a> {
    pub(super) const fn new(
        provider: &'a dyn GitProvider,
        service: &'a dyn ChatCompletionService,
        settings: &'a ReviewSettings,
        prompt: &'a ReviewPrompt,
    ) -> Self {
        Self {
            provider,
            service,
            settings,
            prompt,
        }
    }

    /// Lists the changed files once and annotates their diff, returning
    /// `None` when there are none. Announces the review when publishing.
    pub(super) async fn start(&self) -> Result<Option<ReviewScope>, ToolError> {
        let files = self.provider.changed_files().await?;
        if files.is_empty() {
            tracing::info!(tool = self.prompt.name, "pull request has no files, skipping");
            return Ok(None);
        }

        tracing::info!(tool = self.prompt.name, files = files.len(), "starting review");
        if self.settings.publish_output
            && let Some(message) = self.prompt.preparing_message
        {
            self.publish(message).await;
        }
        let diff = annotate_files(&files);
        Ok(Some(ReviewScope { files, diff }))
    }

    /// Returns the repository override of the user prompt when it exists on
    /// the head branch, otherwise the built-in template.
    pub(super) async fn user_template(&self, head_ref: Option<&str>) -> String {
        let Some(git_ref) = head_ref else {
            return self.prompt.default_user.to_owned();
        };

        match self
            .provider
            .file_content(self.prompt.override_path, git_ref)
            .await
        {
            Ok(Some(template)) if !template.trim().is_empty() => {
                tracing::debug!(path = self.prompt.override_path, "using repository prompt");
                template
            }
            Ok(_) => self.prompt.default_user.to_owned(),
            Err(error) => {
                tracing::debug!(%error, path = self.prompt.override_path, "prompt override unavailable");
                self.prompt.default_user.to_owned()
            }
        }
    }

    /// Renders the built-in system prompt and `user_template` against
    /// `context`.
    pub(super) fn render<S: Serialize>(
        &self,
        user_template: String,
        context: &S,
    ) -> Result<RenderedPrompt, ToolError> {
        PromptTemplate::new(self.prompt.system, user_template).render(context)
    }

    /// Asks the model and publishes a non-empty reply.
    pub(super) async fn predict(
        &self,
        rendered: RenderedPrompt,
    ) -> Result<Option<String>, ToolError> {
        tracing::debug!(tool = self.prompt.name, user_prompt = %rendered.user, "requesting prediction");

        let reply = self
            .service
            .complete(&ChatCompletionRequest {
                model: self.settings.model.clone(),
                temperature: self.settings.temperature,
                system: rendered.system,
                user: rendered.user,
            })
            .await?;

        let prediction = reply.text.trim();
        if prediction.is_empty() {
            return Ok(None);
        }
        if self.settings.publish_output {
            self.publish(prediction).await;
        }
        Ok(Some(prediction.to_owned()))
    }

    pub(super) async fn publish(&self, body: &str) {
        if let Err(error) = self.provider.publish_comment(body).await {
            tracing::warn!(%error, tool = self.prompt.name, "failed to publish comment");
        }
    }
}
