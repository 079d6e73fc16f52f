//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.verity.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `VERITY_*`, plus the legacy `GITHUB_TOKEN`
//!    and `OPENAI_API_KEY` fallbacks
//! 4. **Command-line arguments** – `--pr-url`/`-u`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! pr_url = "https://github.com/owner/repo/pull/123"
//! tool = "check-ticket"
//! model = "gpt-4o-mini"
//! temperature = 0.2
//! publish_output = true
//! judge = "line-overlap"
//! ticket_pattern = "bugs-tag"
//! bugtracker_config_file = "bugtracker.json"
//! ```
//!
//! The tracker base URL is resolved separately by [`bugtracker`], which also
//! honours the `BUGTRACKER_URL` family of environment variables.

pub mod bugtracker;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::ai::{OpenAiConfig, PromptTemplate};
use crate::error::ToolError;
use crate::ticket::{JudgeStrategy, ReportLocale, TicketCheckSettings, TicketPattern};
use crate::tools::{
    ArchitectureSettings, DEFAULT_ARCHITECTURE_BRANCH, DEFAULT_ARCHITECTURE_FILE, ReviewSettings,
    ToolKind,
};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_TIMEOUT_SECONDS: u64 = 60;

const DEFAULT_CHECK_TICKET_SYSTEM_PROMPT: &str = concat!(
    "You verify whether a code change fixes the problem described in a bug ticket.\n",
    "Answer with YAML only, using exactly these keys:\n",
    "solved: yes or no\n",
    "reason: one short sentence"
);

const DEFAULT_CHECK_TICKET_USER_PROMPT: &str = concat!(
    "Ticket description:\n{{ ticket_description }}\n\n",
    "Commit message:\n{{ commit_message }}\n\n",
    "Diff (each changed line is prefixed with its file line number):\n{{ diff }}"
);

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `VERITY_PR_URL` or `--pr-url`: Pull request URL
/// - `VERITY_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `VERITY_TOOL` or `--tool`: `check-ticket`, `performance`, `check-tests`,
///   `architecture`, `architecture-prompt`
/// - `VERITY_AI_API_KEY`, `OPENAI_API_KEY`, or `--ai-api-key`: Model API key
///
/// # Example
///
/// ```no_run
/// use verity::VerityConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = VerityConfig::load().expect("failed to load configuration");
/// let pr_url = config.require_pr_url().expect("PR URL required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "VERITY",
    discovery(
        dotfile_name = ".verity.toml",
        config_file_name = "verity.toml",
        app_name = "verity"
    )
)]
pub struct VerityConfig {
    /// GitHub pull request URL to review.
    ///
    /// Can be provided via:
    /// - CLI: `--pr-url <URL>` or `-u <URL>`
    /// - Environment: `VERITY_PR_URL`
    /// - Config file: `pr_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `VERITY_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Tool to run: `check-ticket` (default), `performance`, or
    /// `check-tests`.
    #[ortho_config(cli_short = 'k')]
    pub tool: Option<String>,

    /// Model identifier sent to the chat-completion provider.
    #[ortho_config()]
    pub model: String,

    /// Sampling temperature for chat completions.
    #[ortho_config()]
    pub temperature: f64,

    /// Publishes tool output as pull request comments.
    ///
    /// Can be provided via:
    /// - CLI: `--publish-output`
    /// - Config file: `publish_output = true`
    #[ortho_config()]
    pub publish_output: bool,

    /// Publishes intermediate artefacts of the AI ticket judge (the rendered
    /// prompt, the raw model reply and the parsed reply) alongside the
    /// verdict. Only honoured together with `publish_output`; set to `false`
    /// to publish the verdict alone.
    #[ortho_config()]
    pub publish_artifacts: bool,

    /// Base URL of the OpenAI-compatible API.
    #[ortho_config()]
    pub ai_base_url: String,

    /// API key for the chat-completion provider.
    ///
    /// Falls back to `OPENAI_API_KEY` when unset.
    #[ortho_config()]
    pub ai_api_key: Option<String>,

    /// Timeout for chat-completion requests, in seconds.
    #[ortho_config()]
    pub ai_timeout_seconds: u64,

    /// Ticket resolution strategy: `ai` (default) or `line-overlap`.
    #[ortho_config()]
    pub judge: Option<String>,

    /// Commit reference rule: `plain` (default) or `bugs-tag`.
    #[ortho_config()]
    pub ticket_pattern: Option<String>,

    /// Language of the ticket verdict: `ru` (default) or `en`.
    #[ortho_config()]
    pub report_locale: Option<String>,

    /// Explicit bug-tracker base URL. Overrides the JSON file and the
    /// `BUGTRACKER_URL` environment variables.
    #[ortho_config()]
    pub bugtracker_url: Option<String>,

    /// Local JSON file holding a `BUGTRACKER_URL` key.
    #[ortho_config()]
    pub bugtracker_config_file: Option<Utf8PathBuf>,

    /// System prompt template for the AI ticket judge.
    #[ortho_config()]
    pub check_ticket_system_prompt: String,

    /// User prompt template for the AI ticket judge. Receives
    /// `ticket_description`, `commit_message` and `diff`.
    #[ortho_config()]
    pub check_ticket_user_prompt: String,

    /// Extra instructions appended to the performance review prompt.
    #[ortho_config()]
    pub performance_extra_instructions: String,

    /// Repository path of the architecture document used by the
    /// architecture review.
    #[ortho_config()]
    pub architecture_file: String,

    /// Branch the architecture documents are read from.
    #[ortho_config()]
    pub architecture_branch: String,

    /// Repository path of additional architecture context.
    #[ortho_config()]
    pub architecture_context: Option<String>,

    /// Extra instructions placed ahead of the architecture context.
    #[ortho_config()]
    pub architecture_extra_instructions: String,
}

impl Default for VerityConfig {
    fn default() -> Self {
        Self {
            pr_url: None,
            token: None,
            tool: None,
            model: DEFAULT_MODEL.to_owned(),
            temperature: 0.2,
            publish_output: false,
            publish_artifacts: true,
            ai_base_url: DEFAULT_AI_BASE_URL.to_owned(),
            ai_api_key: None,
            ai_timeout_seconds: DEFAULT_AI_TIMEOUT_SECONDS,
            judge: None,
            ticket_pattern: None,
            report_locale: None,
            bugtracker_url: None,
            bugtracker_config_file: None,
            check_ticket_system_prompt: DEFAULT_CHECK_TICKET_SYSTEM_PROMPT.to_owned(),
            check_ticket_user_prompt: DEFAULT_CHECK_TICKET_USER_PROMPT.to_owned(),
            performance_extra_instructions: String::new(),
            architecture_file: DEFAULT_ARCHITECTURE_FILE.to_owned(),
            architecture_branch: DEFAULT_ARCHITECTURE_BRANCH.to_owned(),
            architecture_context: None,
            architecture_extra_instructions: String::new(),
        }
    }
}

impl VerityConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, ToolError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ToolError::MissingToken)
    }

    /// Returns the pull request URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::MissingPullRequestUrl`] when no URL is configured.
    pub fn require_pr_url(&self) -> Result<&str, ToolError> {
        self.pr_url
            .as_deref()
            .ok_or(ToolError::MissingPullRequestUrl)
    }

    /// Resolves the model API key, falling back to `OPENAI_API_KEY`.
    #[must_use]
    pub fn resolve_ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Resolves the bug-tracker base URL.
    ///
    /// See [`bugtracker::resolve_tracker_url`] for the lookup order.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] when the configured tracker file
    /// cannot be read or parsed.
    pub fn resolve_tracker_url(&self) -> Result<Option<String>, ToolError> {
        bugtracker::resolve_tracker_url(
            self.bugtracker_url.as_deref(),
            self.bugtracker_config_file.as_deref(),
        )
    }

    /// Builds the chat-completion client configuration.
    #[must_use]
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig::new(
            self.ai_base_url.clone(),
            self.resolve_ai_api_key(),
            Duration::from_secs(self.ai_timeout_seconds),
        )
    }

    /// Returns the configured ticket-judge prompt templates.
    #[must_use]
    pub fn check_ticket_prompt(&self) -> PromptTemplate {
        PromptTemplate::new(
            self.check_ticket_system_prompt.clone(),
            self.check_ticket_user_prompt.clone(),
        )
    }

    /// Selected tool, defaulting to the ticket check.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] for an unknown tool name.
    pub fn tool_kind(&self) -> Result<ToolKind, ToolError> {
        parse_or_default(self.tool.as_deref(), ToolKind::CheckTicket)
    }

    /// Selected ticket resolution strategy, defaulting to the AI judge.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] for an unknown strategy name.
    pub fn judge_strategy(&self) -> Result<JudgeStrategy, ToolError> {
        parse_or_default(self.judge.as_deref(), JudgeStrategy::Ai)
    }

    /// Selected commit reference rule, defaulting to [`TicketPattern::Plain`].
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] for an unknown pattern name.
    pub fn ticket_pattern(&self) -> Result<TicketPattern, ToolError> {
        parse_or_default(self.ticket_pattern.as_deref(), TicketPattern::Plain)
    }

    /// Selected verdict language, defaulting to Russian.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] for an unknown locale.
    pub fn report_locale(&self) -> Result<ReportLocale, ToolError> {
        parse_or_default(self.report_locale.as_deref(), ReportLocale::Russian)
    }

    /// Builds the per-run settings of the ticket check, resolving the
    /// tracker URL and the enum fields.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] for unknown enum values or an
    /// unreadable tracker configuration file.
    pub fn ticket_check_settings(&self) -> Result<TicketCheckSettings, ToolError> {
        Ok(TicketCheckSettings {
            pattern: self.ticket_pattern()?,
            tracker_url: self.resolve_tracker_url()?,
            publish_output: self.publish_output,
            publish_artifacts: self.publish_artifacts,
            locale: self.report_locale()?,
        })
    }

    /// Settings shared by the prompt-driven review tools.
    #[must_use]
    pub fn review_settings(&self) -> ReviewSettings {
        ReviewSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            publish_output: self.publish_output,
        }
    }

    /// Sources of the architecture review context. A blank
    /// `architecture_context` is treated as unset.
    #[must_use]
    pub fn architecture_settings(&self) -> ArchitectureSettings {
        ArchitectureSettings {
            file: self.architecture_file.clone(),
            branch: self.architecture_branch.clone(),
            custom_context: self
                .architecture_context
                .as_deref()
                .map(|path| path.trim().trim_matches(['"', '\'']))
                .filter(|path| !path.is_empty())
                .map(ToOwned::to_owned),
            extra_instructions: self.architecture_extra_instructions.clone(),
        }
    }
}

fn parse_or_default<T>(value: Option<&str>, default: T) -> Result<T, ToolError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.parse::<T>().map_err(|error| ToolError::Configuration {
            message: error.to_string(),
        })
    })
}

#[cfg(test)]
mod tests;
