//! Unit tests for the prompt-driven review tools.

use mockall::predicate::{always, eq, function};
use rstest::{fixture, rstest};

use crate::ai::{ChatCompletion, ChatCompletionRequest, MockChatCompletionService};
use crate::error::ToolError;
use crate::github::{ChangedFile, MockGitProvider, PullRequestMetadata};

use super::{
    ARCHITECTURE_PROMPT_PATH, ArchitectureMode, ArchitectureReview, ArchitectureSettings,
    CHECK_TESTS_PROMPT_PATH, PERFORMANCE_PROMPT_PATH, PerformanceReview, ReviewSettings,
    TestScenarioReview,
};

const ANNOTATED_DIFF: &str = "Diff:\n## File: 'src/parser.rs'\n@@ -1 +1 @@\n1 -a\n1 +b\n";

#[fixture]
fn settings() -> ReviewSettings {
    ReviewSettings {
        model: "gpt-4o-mini".to_owned(),
        temperature: 0.2,
        publish_output: false,
    }
}

fn changed(filename: &str, status: &str) -> ChangedFile {
    ChangedFile {
        filename: filename.to_owned(),
        status: Some(status.to_owned()),
        patch: Some("@@ -1 +1 @@\n-a\n+b".to_owned()),
    }
}

fn metadata() -> PullRequestMetadata {
    PullRequestMetadata {
        number: 4,
        title: Some("Speed up parser".to_owned()),
        description: Some("Avoids reallocations".to_owned()),
        head_ref: Some("perf/parser".to_owned()),
    }
}

/// Provider for a pull request touching `files` whose prompt override at
/// `override_path` holds `override_template`.
fn provider_for(
    files: Vec<ChangedFile>,
    override_path: &'static str,
    override_template: Option<&'static str>,
) -> MockGitProvider {
    let mut provider = MockGitProvider::new();
    provider
        .expect_changed_files()
        .times(1)
        .returning(move || Ok(files.clone()));
    provider
        .expect_pull_request()
        .returning(|| Ok(metadata()));
    provider.expect_diff().never();
    provider
        .expect_file_content()
        .with(eq(override_path), eq("perf/parser"))
        .returning(move |_, _| Ok(override_template.map(ToOwned::to_owned)));
    provider
}

fn service_replying(
    text: &'static str,
    check: impl Fn(&ChatCompletionRequest) -> bool + Send + 'static,
) -> MockChatCompletionService {
    let mut service = MockChatCompletionService::new();
    service
        .expect_complete()
        .with(function(check))
        .times(1)
        .returning(move |_| {
            Ok(ChatCompletion {
                text: text.to_owned(),
                finish_reason: None,
            })
        });
    service
}

#[rstest]
#[tokio::test]
async fn performance_review_skips_pull_request_without_files(settings: ReviewSettings) {
    let mut provider = MockGitProvider::new();
    provider
        .expect_changed_files()
        .times(1)
        .returning(|| Ok(Vec::new()));
    provider.expect_publish_comment().never();
    let mut service = MockChatCompletionService::new();
    service.expect_complete().never();

    let prediction = PerformanceReview::new(&provider, &service, settings, "")
        .run()
        .await;

    assert_eq!(prediction, None);
}

#[rstest]
#[tokio::test]
async fn performance_review_uses_built_in_prompt(settings: ReviewSettings) {
    let provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        PERFORMANCE_PROMPT_PATH,
        None,
    );
    let service = service_replying("- avoid cloning", |request| {
        request.system.contains("performance analysis")
            && request.user.contains(ANNOTATED_DIFF)
            && request.user.ends_with("Focus on allocations.")
    });

    let prediction = PerformanceReview::new(&provider, &service, settings, "Focus on allocations.")
        .run()
        .await;

    assert_eq!(prediction.as_deref(), Some("- avoid cloning"));
}

#[rstest]
#[tokio::test]
async fn performance_review_prefers_repository_prompt(settings: ReviewSettings) {
    let provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        PERFORMANCE_PROMPT_PATH,
        Some("Review {{ title }}: {{ description }}"),
    );
    let service = service_replying("ok", |request| {
        request.user == "Review Speed up parser: Avoids reallocations"
    });

    let prediction = PerformanceReview::new(&provider, &service, settings, "")
        .run()
        .await;

    assert_eq!(prediction.as_deref(), Some("ok"));
}

#[rstest]
#[tokio::test]
async fn performance_review_publishes_progress_then_prediction(mut settings: ReviewSettings) {
    settings.publish_output = true;
    let mut sequence = mockall::Sequence::new();
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        PERFORMANCE_PROMPT_PATH,
        None,
    );
    for body in ["Preparing performance review...", "- avoid cloning"] {
        provider
            .expect_publish_comment()
            .with(eq(body))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
    }
    let service = service_replying("- avoid cloning\n", |_| true);

    let prediction = PerformanceReview::new(&provider, &service, settings, "")
        .run()
        .await;

    assert_eq!(prediction.as_deref(), Some("- avoid cloning"));
}

#[rstest]
#[tokio::test]
async fn broken_repository_prompt_is_logged_not_raised(settings: ReviewSettings) {
    let provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        PERFORMANCE_PROMPT_PATH,
        Some("{{ undefined_variable }}"),
    );
    let mut service = MockChatCompletionService::new();
    service.expect_complete().never();

    let prediction = PerformanceReview::new(&provider, &service, settings, "")
        .run()
        .await;

    assert_eq!(prediction, None);
}

#[rstest]
#[tokio::test]
async fn test_scenarios_include_changed_file_contents(settings: ReviewSettings) {
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified"), changed("src/old.rs", "removed")],
        CHECK_TESTS_PROMPT_PATH,
        None,
    );
    provider
        .expect_file_content()
        .with(eq("src/parser.rs"), eq("perf/parser"))
        .times(1)
        .returning(|_, _| Ok(Some("fn parse() {}".to_owned())));
    let service = service_replying("- parse empty input", |request| {
        request.user.contains("==file name==\n\nsrc/parser.rs")
            && request.user.contains("fn parse() {}")
            && !request.user.contains("src/old.rs")
    });

    let prediction = TestScenarioReview::new(&provider, &service, settings)
        .run()
        .await;

    assert_eq!(prediction.as_deref(), Some("- parse empty input"));
}

#[rstest]
#[tokio::test]
async fn unreadable_file_is_skipped(settings: ReviewSettings) {
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        CHECK_TESTS_PROMPT_PATH,
        None,
    );
    provider
        .expect_file_content()
        .with(eq("src/parser.rs"), always())
        .returning(|_, _| {
            Err(ToolError::Api {
                message: "too large".to_owned(),
            })
        });
    let service = service_replying("- scenario", |request| {
        request.user.contains("Files:\n\n")
    });

    let prediction = TestScenarioReview::new(&provider, &service, settings)
        .run()
        .await;

    assert_eq!(prediction.as_deref(), Some("- scenario"));
}

#[rstest]
#[tokio::test]
async fn completion_failure_yields_none(settings: ReviewSettings) {
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        CHECK_TESTS_PROMPT_PATH,
        None,
    );
    provider
        .expect_file_content()
        .with(eq("src/parser.rs"), always())
        .returning(|_, _| Ok(None));
    let mut service = MockChatCompletionService::new();
    service.expect_complete().times(1).returning(|_| {
        Err(ToolError::Api {
            message: "rate limited".to_owned(),
        })
    });

    let prediction = TestScenarioReview::new(&provider, &service, settings)
        .run()
        .await;

    assert_eq!(prediction, None);
}

fn architecture_settings() -> ArchitectureSettings {
    ArchitectureSettings {
        custom_context: Some("docs/context.md".to_owned()),
        ..ArchitectureSettings::default()
    }
}

fn with_architecture_documents(
    provider: &mut MockGitProvider,
    base: Result<Option<&'static str>, &'static str>,
) {
    provider
        .expect_file_content()
        .with(eq("ARHITECTURE.md"), eq("master"))
        .times(1)
        .returning(move |_, _| {
            base.map(|content| content.map(ToOwned::to_owned))
                .map_err(|message| ToolError::Api {
                    message: message.to_owned(),
                })
        });
    provider
        .expect_file_content()
        .with(eq("docs/context.md"), eq("master"))
        .times(1)
        .returning(|_, _| Ok(Some("Handlers never touch the database.".to_owned())));
}

#[rstest]
#[tokio::test]
async fn architecture_review_appends_architecture_documents(settings: ReviewSettings) {
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        ARCHITECTURE_PROMPT_PATH,
        None,
    );
    with_architecture_documents(&mut provider, Ok(Some("Layers: api -> core -> storage")));
    let service = service_replying("- parser reaches into storage", |request| {
        request.system.contains("software architect")
            && request.user.contains(ANNOTATED_DIFF)
            && request.user.contains(concat!(
                "Keep it short.\n\nProject architecture context from ARHITECTURE.md:\n",
                "Layers: api -> core -> storage\n\n\n",
                "Additional architecture context from docs/context.md:\n",
                "Handlers never touch the database.\n"
            ))
    });
    let architecture = ArchitectureSettings {
        extra_instructions: "Keep it short.".to_owned(),
        ..architecture_settings()
    };

    let prediction = ArchitectureReview::new(
        &provider,
        &service,
        settings,
        architecture,
        ArchitectureMode::Review,
    )
    .run()
    .await;

    assert_eq!(prediction.as_deref(), Some("- parser reaches into storage"));
}

#[rstest]
#[tokio::test]
async fn unreadable_architecture_document_is_left_out(settings: ReviewSettings) {
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        ARCHITECTURE_PROMPT_PATH,
        None,
    );
    with_architecture_documents(&mut provider, Err("forbidden"));
    let service = service_replying("- fine", |request| {
        !request.user.contains("Project architecture context")
            && request.user.contains("Additional architecture context from docs/context.md")
    });

    let prediction = ArchitectureReview::new(
        &provider,
        &service,
        settings,
        architecture_settings(),
        ArchitectureMode::Review,
    )
    .run()
    .await;

    assert_eq!(prediction.as_deref(), Some("- fine"));
}

#[rstest]
#[tokio::test]
async fn architecture_prompt_is_published_without_calling_the_model(
    mut settings: ReviewSettings,
) {
    settings.publish_output = true;
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        ARCHITECTURE_PROMPT_PATH,
        None,
    );
    with_architecture_documents(&mut provider, Ok(None));
    provider
        .expect_publish_comment()
        .with(function(|body: &str| {
            body.starts_with("**System Prompt**\n```\nYou are a senior software architect")
                && body.contains("\n```\n\n**User Prompt**\n```\nPull request: Speed up parser")
                && body.ends_with("\n```")
        }))
        .times(1)
        .returning(|_| Ok(()));
    let mut service = MockChatCompletionService::new();
    service.expect_complete().never();

    let prompt = ArchitectureReview::new(
        &provider,
        &service,
        settings,
        architecture_settings(),
        ArchitectureMode::PromptOnly,
    )
    .run()
    .await;

    assert!(
        prompt
            .as_deref()
            .is_some_and(|text| text.contains("Handlers never touch the database.")),
        "{prompt:?}"
    );
}

#[rstest]
#[tokio::test]
async fn architecture_prompt_stays_private_without_publishing(settings: ReviewSettings) {
    let mut provider = provider_for(
        vec![changed("src/parser.rs", "modified")],
        ARCHITECTURE_PROMPT_PATH,
        None,
    );
    with_architecture_documents(&mut provider, Ok(Some("Layers")));
    provider.expect_publish_comment().never();
    let mut service = MockChatCompletionService::new();
    service.expect_complete().never();

    let prompt = ArchitectureReview::new(
        &provider,
        &service,
        settings,
        architecture_settings(),
        ArchitectureMode::PromptOnly,
    )
    .run()
    .await;

    assert!(prompt.is_some_and(|text| text.starts_with("**System Prompt**")));
}

#[rstest]
#[tokio::test]
async fn architecture_prompt_skips_files_without_patches(settings: ReviewSettings) {
    let mut provider = MockGitProvider::new();
    provider.expect_changed_files().times(1).returning(|| {
        Ok(vec![ChangedFile {
            filename: "logo.png".to_owned(),
            status: Some("added".to_owned()),
            patch: None,
        }])
    });
    provider.expect_pull_request().never();
    provider.expect_publish_comment().never();
    let mut service = MockChatCompletionService::new();
    service.expect_complete().never();

    let prompt = ArchitectureReview::new(
        &provider,
        &service,
        settings,
        architecture_settings(),
        ArchitectureMode::PromptOnly,
    )
    .run()
    .await;

    assert_eq!(prompt, None);
}
