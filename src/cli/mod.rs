//! Tool dispatch for the CLI.
//!
//! - [`check_ticket`]: ticket-resolution verification
//! - [`reviews`]: performance, test-scenario and architecture reviews
//!
//! Output formatting utilities are in [`output`].

use verity::tools::ArchitectureMode;
use verity::{
    OctocrabGitProvider, OpenAiChatCompletionService, PersonalAccessToken, PullRequestLocator,
    ToolError, ToolKind, VerityConfig,
};

pub mod check_ticket;
pub mod output;
pub mod reviews;

/// Runs the configured tool and returns its output text, if any.
///
/// # Errors
///
/// Returns [`ToolError`] when configuration is incomplete or invalid, or
/// the GitHub client cannot be built. Failures inside a tool run are
/// reported through its output instead.
pub async fn run(config: &VerityConfig) -> Result<Option<String>, ToolError> {
    let tool = config.tool_kind()?;
    let provider = connect(config)?;
    let service = OpenAiChatCompletionService::new(config.openai_config());

    tracing::info!(%tool, "running tool");
    match tool {
        ToolKind::CheckTicket => check_ticket::run(config, &provider, &service)
            .await
            .map(Some),
        ToolKind::Performance => Ok(reviews::performance(config, &provider, &service).await),
        ToolKind::CheckTests => Ok(reviews::check_tests(config, &provider, &service).await),
        ToolKind::Architecture => Ok(reviews::architecture(
            config,
            &provider,
            &service,
            ArchitectureMode::Review,
        )
        .await),
        ToolKind::ArchitecturePrompt => Ok(reviews::architecture(
            config,
            &provider,
            &service,
            ArchitectureMode::PromptOnly,
        )
        .await),
    }
}

fn connect(config: &VerityConfig) -> Result<OctocrabGitProvider, ToolError> {
    let pr_url = config.require_pr_url()?;
    let token_value = config.resolve_token()?;

    let locator = PullRequestLocator::parse(pr_url)?;
    let token = PersonalAccessToken::new(token_value)?;

    OctocrabGitProvider::for_token(&token, &locator)
}
