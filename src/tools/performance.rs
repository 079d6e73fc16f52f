//! Performance review of a pull request diff.

use serde::Serialize;

use crate::ai::ChatCompletionService;
use crate::error::ToolError;
use crate::github::GitProvider;

use super::pipeline::{ReviewPipeline, ReviewPrompt, ReviewSettings};

/// Repository file overriding the performance user prompt.
pub const PERFORMANCE_PROMPT_PATH: &str = ".verity/prompts/performance.md";

const PROMPT: ReviewPrompt = ReviewPrompt {
    name: "performance",
    override_path: PERFORMANCE_PROMPT_PATH,
    system: "You are a code review assistant specializing in performance analysis.",
    default_user: concat!(
        "You are a performance reviewer for a pull request.\n",
        "Diff:\n{{ diff }}\n\n",
        "Provide a bullet list of performance issues and suggestions.",
        "{% if extra_instructions %}\n\n{{ extra_instructions }}{% endif %}"
    ),
    preparing_message: Some("Preparing performance review..."),
};

#[derive(Serialize)]
struct PerformanceContext<'a> {
    title: &'a str,
    description: &'a str,
    diff: &'a str,
    extra_instructions: &'a str,
}

/// Asks the model for performance issues in the pull request.
pub struct PerformanceReview<'a> {
    provider: &'a dyn GitProvider,
    service: &'a dyn ChatCompletionService,
    settings: ReviewSettings,
    extra_instructions: String,
}

impl<'a> PerformanceReview<'a> {
    /// Creates the review.
    #[must_use]
    pub fn new(
        provider: &'a dyn GitProvider,
        service: &'a dyn ChatCompletionService,
        settings: ReviewSettings,
        extra_instructions: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            service,
            settings,
            extra_instructions: extra_instructions.into(),
        }
    }

    /// Runs the review, returning the prediction.
    ///
    /// Returns `None` when the pull request has no files, the model answered
    /// with nothing, or any step failed (the failure is logged).
    pub async fn run(&self) -> Option<String> {
        self.try_run().await.unwrap_or_else(|error| {
            tracing::error!(%error, "error generating performance review");
            None
        })
    }

    async fn try_run(&self) -> Result<Option<String>, ToolError> {
        let pipeline = ReviewPipeline::new(self.provider, self.service, &self.settings, &PROMPT);
        let Some(scope) = pipeline.start().await? else {
            return Ok(None);
        };

        let metadata = self.provider.pull_request().await?;
        let user_template = pipeline.user_template(metadata.head_ref.as_deref()).await;
        let context = PerformanceContext {
            title: metadata.title.as_deref().unwrap_or_default(),
            description: metadata.description.as_deref().unwrap_or_default(),
            diff: scope.diff.as_str(),
            extra_instructions: &self.extra_instructions,
        };

        pipeline.predict(pipeline.render(user_template, &context)?).await
    }
}
