//! Strategies deciding whether a change resolves a ticket.
//!
//! [`AiResolutionJudge`] asks a language model for a YAML verdict;
//! [`LineOverlapJudge`] checks whether the diff touched a line the ticket
//! cites. Both sit behind [`ResolutionJudge`] so the ticket check does not
//! know which one is wired in.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_yaml::Value;

use crate::ai::{ChatCompletionRequest, ChatCompletionService, PromptTemplate};
use crate::github::DiffDocument;

use super::ranges::{extract_line_ranges, touched_lines};

/// Everything a judge may inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgeInput {
    /// Ticket description from the tracker.
    pub description: String,
    /// Last commit message line naming the ticket.
    pub commit_message: String,
    /// Line-numbered pull request diff.
    pub diff: DiffDocument,
}

/// Outcome of a judgement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Judgement {
    /// Whether the change resolves the ticket.
    pub solved: bool,
    /// Intermediate outputs in production order: the rendered prompt, the
    /// raw model reply and the parsed reply as normalised YAML. Empty for
    /// strategies that have none.
    pub artifacts: Vec<String>,
}

impl Judgement {
    const fn bare(solved: bool) -> Self {
        Self {
            solved,
            artifacts: Vec::new(),
        }
    }
}

/// Decides ticket resolution. Implementations never fail; internal faults
/// degrade to `solved = false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResolutionJudge: Send + Sync {
    /// Judges whether the change in `input` resolves the ticket.
    async fn judge(&self, input: &JudgeInput) -> Judgement;
}

/// Configured judge variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JudgeStrategy {
    /// Language model verdict.
    #[default]
    Ai,
    /// Deterministic line overlap.
    LineOverlap,
}

impl FromStr for JudgeStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ai" => Ok(Self::Ai),
            "line-overlap" => Ok(Self::LineOverlap),
            other => Err(format!(
                "unknown judge strategy '{other}' (expected 'ai' or 'line-overlap')"
            )),
        }
    }
}

impl fmt::Display for JudgeStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Ai => "ai",
            Self::LineOverlap => "line-overlap",
        })
    }
}

/// Solved iff a line range cited by the description was added or removed
/// by the diff.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOverlapJudge;

impl LineOverlapJudge {
    /// Applies the overlap rule without going through the async trait.
    #[must_use]
    pub fn decide(description: &str, diff: &DiffDocument) -> bool {
        let ranges = extract_line_ranges(description);
        if ranges.is_empty() {
            return false;
        }
        let touched = touched_lines(diff);
        ranges.iter().any(|range| range.overlaps(&touched))
    }
}

#[async_trait]
impl ResolutionJudge for LineOverlapJudge {
    async fn judge(&self, input: &JudgeInput) -> Judgement {
        Judgement::bare(Self::decide(&input.description, &input.diff))
    }
}

#[derive(Serialize)]
struct JudgeContext<'a> {
    ticket_description: &'a str,
    commit_message: &'a str,
    diff: &'a str,
}

/// Asks a chat-completion model whether the change resolves the ticket.
///
/// The prompts receive `ticket_description`, `commit_message` and `diff`.
/// The reply must be YAML with a `solved` key; `yes`, `true` and `1` are
/// affirmative, anything else (or any failure) is not.
#[derive(Clone)]
pub struct AiResolutionJudge {
    service: Arc<dyn ChatCompletionService>,
    prompt: PromptTemplate,
    model: String,
    temperature: f64,
}

impl fmt::Debug for AiResolutionJudge {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AiResolutionJudge")
            .field("prompt", &self.prompt)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl AiResolutionJudge {
    /// Creates a judge sending `prompt` to `service`.
    #[must_use]
    pub fn new(
        service: Arc<dyn ChatCompletionService>,
        prompt: PromptTemplate,
        model: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            service,
            prompt,
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl ResolutionJudge for AiResolutionJudge {
    async fn judge(&self, input: &JudgeInput) -> Judgement {
        let context = JudgeContext {
            ticket_description: &input.description,
            commit_message: &input.commit_message,
            diff: input.diff.as_str(),
        };
        let rendered = match self.prompt.render(&context) {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::error!(%error, "AI validation failed: prompt rendering");
                return Judgement::bare(false);
            }
        };

        let mut artifacts = vec![rendered.user.clone()];
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            system: rendered.system,
            user: rendered.user,
        };
        let reply = match self.service.complete(&request).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::error!(%error, model = %self.model, "AI validation failed: completion");
                return Judgement {
                    solved: false,
                    artifacts,
                };
            }
        };

        let parsed = parse_reply(&reply.text);
        if let Err(error) = &parsed {
            tracing::error!(%error, response = %reply.text, "AI validation failed: reply parsing");
        }
        artifacts.push(reply.text);
        let solved = parsed.is_ok_and(|document| {
            artifacts.extend(normalised_yaml(&document));
            is_solved(&document)
        });

        Judgement { solved, artifacts }
    }
}

/// Reads the `solved` verdict from a YAML model reply.
///
/// # Errors
///
/// Returns the YAML error when the trimmed reply is not valid YAML.
pub fn parse_solved(reply: &str) -> Result<bool, serde_yaml::Error> {
    parse_reply(reply).map(|document| is_solved(&document))
}

fn parse_reply(reply: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(strip_code_fence(reply))
}

fn is_solved(document: &Value) -> bool {
    document
        .as_mapping()
        .and_then(|mapping| mapping.get("solved"))
        .map(yaml_scalar_text)
        .is_some_and(|text| matches!(text.to_lowercase().as_str(), "yes" | "true" | "1"))
}

/// Re-serialises a parsed reply so the published artefact shows what the
/// verdict was read from.
fn normalised_yaml(document: &Value) -> Option<String> {
    serde_yaml::to_string(document)
        .ok()
        .map(|text| text.trim_end().to_owned())
}

fn yaml_scalar_text(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        _ => String::new(),
    }
}

/// Removes a surrounding Markdown code fence (with or without a language
/// tag) from a trimmed reply.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(opened) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some((_, body)) = opened.split_once('\n') else {
        return trimmed;
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
#[path = "judge_tests.rs"]
mod tests;
