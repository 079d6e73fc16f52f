//! Ticket-resolution verification operation.

use std::sync::Arc;

use verity::{
    AiResolutionJudge, GitProvider, HttpTicketTracker, JudgeStrategy, LineOverlapJudge,
    OpenAiChatCompletionService, ResolutionJudge, TicketCheck, ToolError, VerityConfig,
};

/// Runs the ticket check and returns the rendered verdict.
///
/// # Errors
///
/// Returns [`ToolError::Configuration`] for invalid ticket check settings
/// or when the tracker HTTP client cannot be built.
pub async fn run(
    config: &VerityConfig,
    provider: &dyn GitProvider,
    service: &OpenAiChatCompletionService,
) -> Result<String, ToolError> {
    let settings = config.ticket_check_settings()?;
    let tracker = HttpTicketTracker::new()?;
    let judge: Box<dyn ResolutionJudge> = match config.judge_strategy()? {
        JudgeStrategy::Ai => Box::new(AiResolutionJudge::new(
            Arc::new(service.clone()),
            config.check_ticket_prompt(),
            config.model.clone(),
            config.temperature,
        )),
        JudgeStrategy::LineOverlap => Box::new(LineOverlapJudge),
    };

    let report = TicketCheck::new(provider, &tracker, judge.as_ref(), settings)
        .run()
        .await;
    Ok(report.message)
}
