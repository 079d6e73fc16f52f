//! Architecture review of a pull request.
//!
//! The review prompt is enriched with the project's architecture document,
//! read from a fixed branch of the repository, and an optional extra context
//! file. [`ArchitectureMode::PromptOnly`] stops after rendering and returns
//! both prompts as a Markdown comment instead of asking the model, so prompt
//! authors can inspect exactly what would be sent.

use serde::Serialize;

use crate::ai::{ChatCompletionService, RenderedPrompt};
use crate::error::ToolError;
use crate::github::GitProvider;

use super::pipeline::{ReviewPipeline, ReviewPrompt, ReviewSettings};

/// Repository file overriding the architecture user prompt.
pub const ARCHITECTURE_PROMPT_PATH: &str = ".verity/prompts/architecture.md";

/// Architecture document read when none is configured.
pub const DEFAULT_ARCHITECTURE_FILE: &str = "ARHITECTURE.md";

/// Branch the architecture documents are read from when none is configured.
pub const DEFAULT_ARCHITECTURE_BRANCH: &str = "master";

const SYSTEM_PROMPT: &str = concat!(
    "You are a senior software architect reviewing a pull request for ",
    "consistency with the project's architecture."
);

const DEFAULT_USER_PROMPT: &str = concat!(
    "Pull request: {{ title }}\n",
    "{% if description %}Description:\n{{ description }}\n{% endif %}\n",
    "Diff:\n{{ diff }}\n\n",
    "Review the change for architectural problems: layering violations, ",
    "misplaced responsibilities, new coupling between modules and departures ",
    "from documented conventions. Provide a bullet list of findings with ",
    "suggested fixes.",
    "{% if extra_instructions %}\n\n{{ extra_instructions }}{% endif %}"
);

const REVIEW_PROMPT: ReviewPrompt = ReviewPrompt {
    name: "architecture",
    override_path: ARCHITECTURE_PROMPT_PATH,
    system: SYSTEM_PROMPT,
    default_user: DEFAULT_USER_PROMPT,
    preparing_message: Some("Preparing architecture review..."),
};

const PROMPT_ONLY_PROMPT: ReviewPrompt = ReviewPrompt {
    name: "architecture-prompt",
    preparing_message: None,
    ..REVIEW_PROMPT
};

/// Whether the architecture review asks the model or only shows the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchitectureMode {
    /// Render the prompt, ask the model and return its review.
    #[default]
    Review,
    /// Render the prompt and return it without calling the model.
    PromptOnly,
}

/// Where the architecture context comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureSettings {
    /// Repository path of the architecture document.
    pub file: String,
    /// Branch both documents are read from.
    pub branch: String,
    /// Optional repository path of additional context.
    pub custom_context: Option<String>,
    /// Instructions placed ahead of the architecture context.
    pub extra_instructions: String,
}

impl Default for ArchitectureSettings {
    fn default() -> Self {
        Self {
            file: DEFAULT_ARCHITECTURE_FILE.to_owned(),
            branch: DEFAULT_ARCHITECTURE_BRANCH.to_owned(),
            custom_context: None,
            extra_instructions: String::new(),
        }
    }
}

#[derive(Serialize)]
struct ArchitectureContext<'a> {
    title: &'a str,
    description: &'a str,
    diff: &'a str,
    extra_instructions: &'a str,
}

/// Reviews the pull request against the project's architecture documents.
pub struct ArchitectureReview<'a> {
    provider: &'a dyn GitProvider,
    service: &'a dyn ChatCompletionService,
    settings: ReviewSettings,
    architecture: ArchitectureSettings,
    mode: ArchitectureMode,
}

impl<'a> ArchitectureReview<'a> {
    /// Creates the review.
    #[must_use]
    pub const fn new(
        provider: &'a dyn GitProvider,
        service: &'a dyn ChatCompletionService,
        settings: ReviewSettings,
        architecture: ArchitectureSettings,
        mode: ArchitectureMode,
    ) -> Self {
        Self {
            provider,
            service,
            settings,
            architecture,
            mode,
        }
    }

    /// Runs the review, returning the model's answer or, in
    /// [`ArchitectureMode::PromptOnly`], the rendered prompts.
    ///
    /// Returns `None` when the pull request has no files, the model answered
    /// with nothing, or any step failed (the failure is logged).
    pub async fn run(&self) -> Option<String> {
        self.try_run().await.unwrap_or_else(|error| {
            tracing::error!(%error, mode = ?self.mode, "error generating architecture review");
            None
        })
    }

    async fn try_run(&self) -> Result<Option<String>, ToolError> {
        let prompt = match self.mode {
            ArchitectureMode::Review => &REVIEW_PROMPT,
            ArchitectureMode::PromptOnly => &PROMPT_ONLY_PROMPT,
        };
        let pipeline = ReviewPipeline::new(self.provider, self.service, &self.settings, prompt);
        let Some(scope) = pipeline.start().await? else {
            return Ok(None);
        };
        if self.mode == ArchitectureMode::PromptOnly && scope.diff.is_empty() {
            tracing::warn!("pull request diff is empty, skipping architecture prompt");
            return Ok(None);
        }

        let metadata = self.provider.pull_request().await?;
        let user_template = pipeline.user_template(metadata.head_ref.as_deref()).await;
        let extra_instructions = self.extra_instructions().await;
        let context = ArchitectureContext {
            title: metadata.title.as_deref().unwrap_or_default(),
            description: metadata.description.as_deref().unwrap_or_default(),
            diff: scope.diff.as_str(),
            extra_instructions: &extra_instructions,
        };
        let rendered = pipeline.render(user_template, &context)?;

        match self.mode {
            ArchitectureMode::Review => pipeline.predict(rendered).await,
            ArchitectureMode::PromptOnly => {
                let comment = prompt_comment(&rendered);
                if self.settings.publish_output {
                    pipeline.publish(&comment).await;
                } else {
                    tracing::info!(prompt = %comment, "architecture review prompt");
                }
                Ok(Some(comment))
            }
        }
    }

    /// Configured extra instructions followed by whichever architecture
    /// documents could be read.
    async fn extra_instructions(&self) -> String {
        let mut extra = self.architecture.extra_instructions.clone();
        if let Some(content) = self.load(&self.architecture.file).await {
            extra.push_str(&format!(
                "\n\nProject architecture context from {}:\n{content}\n",
                self.architecture.file
            ));
        }
        if let Some(path) = self.architecture.custom_context.as_deref()
            && let Some(content) = self.load(path).await
        {
            extra.push_str(&format!(
                "\n\nAdditional architecture context from {path}:\n{content}\n"
            ));
        }
        extra
    }

    async fn load(&self, path: &str) -> Option<String> {
        match self
            .provider
            .file_content(path, &self.architecture.branch)
            .await
        {
            Ok(Some(content)) if !content.trim().is_empty() => Some(content),
            Ok(_) => {
                tracing::warn!(path, branch = %self.architecture.branch, "architecture file not found");
                None
            }
            Err(error) => {
                tracing::warn!(%error, path, "failed to load architecture file");
                None
            }
        }
    }
}

fn prompt_comment(rendered: &RenderedPrompt) -> String {
    format!(
        "**System Prompt**\n```\n{}\n```\n\n**User Prompt**\n```\n{}\n```",
        rendered.system, rendered.user
    )
}
