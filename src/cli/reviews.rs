//! Prompt-driven review operations.

use verity::tools::{ArchitectureMode, ArchitectureReview};
use verity::{
    ChatCompletionService, GitProvider, PerformanceReview, TestScenarioReview, VerityConfig,
};

/// Runs the performance review.
pub async fn performance(
    config: &VerityConfig,
    provider: &dyn GitProvider,
    service: &dyn ChatCompletionService,
) -> Option<String> {
    PerformanceReview::new(
        provider,
        service,
        config.review_settings(),
        config.performance_extra_instructions.clone(),
    )
    .run()
    .await
}

/// Runs the test-scenario review.
pub async fn check_tests(
    config: &VerityConfig,
    provider: &dyn GitProvider,
    service: &dyn ChatCompletionService,
) -> Option<String> {
    TestScenarioReview::new(provider, service, config.review_settings())
        .run()
        .await
}

/// Runs the architecture review, or renders its prompt only.
pub async fn architecture(
    config: &VerityConfig,
    provider: &dyn GitProvider,
    service: &dyn ChatCompletionService,
    mode: ArchitectureMode,
) -> Option<String> {
    ArchitectureReview::new(
        provider,
        service,
        config.review_settings(),
        config.architecture_settings(),
        mode,
    )
    .run()
    .await
}
