//! Unit tests for the resolution judges.

use std::sync::Arc;

use mockall::predicate::function;
use rstest::{fixture, rstest};

use crate::ai::{ChatCompletion, ChatCompletionRequest, MockChatCompletionService, PromptTemplate};
use crate::error::ToolError;
use crate::github::DiffDocument;
use crate::github::diff::annotate_patch;

use super::{
    AiResolutionJudge, JudgeInput, JudgeStrategy, LineOverlapJudge, ResolutionJudge, parse_solved,
    strip_code_fence,
};

const DIFF: &str = concat!(
    "## File: 'src/parser.rs'\n",
    "@@ -10,3 +10,3 @@\n",
    "10  let a = 1;\n",
    "11 -let b = 2;\n",
    "11 +let b = 3;\n",
    "12  run(a, b);\n",
);

fn base_input() -> JudgeInput {
    JudgeInput {
        description: "Crash at line 11".to_owned(),
        commit_message: "core: 123: fix crash".to_owned(),
        diff: DiffDocument::new(DIFF),
    }
}

#[fixture]
fn judge_input() -> JudgeInput {
    base_input()
}

fn prompt() -> PromptTemplate {
    PromptTemplate::new(
        "Judge the fix.",
        "T={{ ticket_description }} C={{ commit_message }} D={{ diff | length }}",
    )
}

fn reply(text: &str) -> ChatCompletion {
    ChatCompletion {
        text: text.to_owned(),
        finish_reason: Some("stop".to_owned()),
    }
}

fn judge_with(service: MockChatCompletionService, template: PromptTemplate) -> AiResolutionJudge {
    AiResolutionJudge::new(Arc::new(service), template, "gpt-4o-mini", 0.2)
}

#[rstest]
#[case::yes("solved: yes", true)]
#[case::bool_true("solved: true", true)]
#[case::capitalised("solved: True\nreason: fixed", true)]
#[case::one("solved: 1", true)]
#[case::quoted_yes("solved: 'YES'", true)]
#[case::no("solved: no", false)]
#[case::bool_false("solved: false", false)]
#[case::missing_key("reason: unclear", false)]
#[case::scalar_document("yes", false)]
#[case::list_document("- solved: yes", false)]
#[case::nested_value("solved:\n  value: yes", false)]
#[case::fenced("```yaml\nsolved: yes\n```", true)]
#[case::fenced_without_language("```\nsolved: true\n```\n", true)]
fn replies_are_interpreted(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(parse_solved(text).ok(), Some(expected));
}

#[rstest]
fn invalid_yaml_is_an_error() {
    assert!(parse_solved("solved: [yes").is_err());
}

#[rstest]
#[case::plain("solved: yes", "solved: yes")]
#[case::unterminated("```yaml\nsolved: yes", "solved: yes")]
#[case::single_line_fence("```solved```", "```solved```")]
fn code_fences_are_removed(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(strip_code_fence(text), expected);
}

#[rstest]
#[case::solved(base_input(), true)]
#[case::cites_untouched_line(JudgeInput { description: "line 40".to_owned(), ..base_input() }, false)]
#[case::no_ranges(JudgeInput { description: "parser crashes".to_owned(), ..base_input() }, false)]
#[case::empty_description(JudgeInput { description: String::new(), ..base_input() }, false)]
#[case::range_spans_change(JudgeInput { description: "строки 5-20".to_owned(), ..base_input() }, true)]
#[tokio::test]
async fn line_overlap_judge_requires_touched_cited_line(
    #[case] input: JudgeInput,
    #[case] expected: bool,
) {
    let judgement = LineOverlapJudge.judge(&input).await;

    assert_eq!(judgement.solved, expected);
    assert!(judgement.artifacts.is_empty());
}

#[rstest]
fn context_lines_do_not_count_as_touched() {
    assert!(!LineOverlapJudge::decide(
        "line 10",
        &DiffDocument::new(DIFF)
    ));
}

#[rstest]
#[case::list_item("Bug at line 12")]
#[case::nested_list_item("Bug at line 13")]
fn signed_context_lines_are_not_solved(#[case] description: &str) {
    let diff = DiffDocument::new(annotate_patch(
        "@@ -10,4 +10,4 @@\n a\n-b\n+B\n - item\n   - nested",
    ));

    assert!(!LineOverlapJudge::decide(description, &diff), "{diff}");
    assert!(LineOverlapJudge::decide("Bug at line 11", &diff), "{diff}");
}

#[rstest]
#[tokio::test]
async fn ai_judge_renders_prompts_and_records_artifacts(judge_input: JudgeInput) {
    let mut service = MockChatCompletionService::new();
    service
        .expect_complete()
        .with(function(|request: &ChatCompletionRequest| {
            request.system == "Judge the fix."
                && request.user.starts_with("T=Crash at line 11 C=core: 123: fix crash D=")
                && request.model == "gpt-4o-mini"
        }))
        .times(1)
        .returning(|_| Ok(reply("```yaml\nsolved: true\nreason: fixed\n```")));

    let judgement = judge_with(service, prompt()).judge(&judge_input).await;

    assert!(judgement.solved);
    let artifacts: Vec<&str> = judgement.artifacts.iter().map(String::as_str).collect();
    assert_eq!(artifacts.len(), 3, "{artifacts:?}");
    assert!(artifacts.first().is_some_and(|user| user.starts_with("T=Crash")));
    assert_eq!(
        artifacts.get(1..),
        Some(
            &[
                "```yaml\nsolved: true\nreason: fixed\n```",
                "solved: true\nreason: fixed"
            ][..]
        )
    );
}

#[rstest]
#[tokio::test]
async fn ai_judge_records_parsed_reply_without_solved_key(judge_input: JudgeInput) {
    let mut service = MockChatCompletionService::new();
    service
        .expect_complete()
        .times(1)
        .returning(|_| Ok(reply("reason: unclear")));

    let judgement = judge_with(service, prompt()).judge(&judge_input).await;

    assert!(!judgement.solved);
    assert_eq!(
        judgement.artifacts.last().map(String::as_str),
        Some("reason: unclear")
    );
    assert_eq!(judgement.artifacts.len(), 3);
}

#[rstest]
#[tokio::test]
async fn ai_judge_fails_closed_on_undefined_variable(judge_input: JudgeInput) {
    let mut service = MockChatCompletionService::new();
    service.expect_complete().never();

    let judgement = judge_with(service, PromptTemplate::new("sys", "{{ ticket_title }}"))
        .judge(&judge_input)
        .await;

    assert!(!judgement.solved);
    assert!(judgement.artifacts.is_empty());
}

#[rstest]
#[tokio::test]
async fn ai_judge_fails_closed_on_completion_error(judge_input: JudgeInput) {
    let mut service = MockChatCompletionService::new();
    service.expect_complete().times(1).returning(|_| {
        Err(ToolError::Network {
            message: "connection reset".to_owned(),
        })
    });

    let judgement = judge_with(service, prompt()).judge(&judge_input).await;

    assert!(!judgement.solved);
    assert_eq!(judgement.artifacts.len(), 1, "only the prompt was produced");
}

#[rstest]
#[tokio::test]
async fn ai_judge_fails_closed_on_unparseable_reply(judge_input: JudgeInput) {
    let mut service = MockChatCompletionService::new();
    service
        .expect_complete()
        .times(1)
        .returning(|_| Ok(reply("solved: [yes")));

    let judgement = judge_with(service, prompt()).judge(&judge_input).await;

    assert!(!judgement.solved);
    assert_eq!(judgement.artifacts.len(), 2, "no parsed document to record");
    assert_eq!(judgement.artifacts.last().map(String::as_str), Some("solved: [yes"));
}

#[rstest]
#[case("ai", JudgeStrategy::Ai)]
#[case("Line-Overlap", JudgeStrategy::LineOverlap)]
fn strategies_parse_from_configuration(#[case] raw: &str, #[case] expected: JudgeStrategy) {
    assert_eq!(raw.parse::<JudgeStrategy>(), Ok(expected));
}
