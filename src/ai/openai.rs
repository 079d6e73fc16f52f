//! OpenAI-compatible HTTP implementation of [`ChatCompletionService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

use super::completion::{ChatCompletion, ChatCompletionRequest, ChatCompletionService};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`OpenAiChatCompletionService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// Base API URL (e.g., `https://api.openai.com/v1`).
    pub base_url: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OpenAiConfig {
    /// Constructs configuration with required API settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout,
        }
    }
}

/// OpenAI-compatible chat-completion client.
#[derive(Debug, Clone, Default)]
pub struct OpenAiChatCompletionService {
    config: OpenAiConfig,
}

impl OpenAiChatCompletionService {
    /// Creates a service from explicit configuration.
    #[must_use]
    pub const fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    fn extract_api_key(&self) -> Result<&str, ToolError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::Configuration {
                message: concat!(
                    "AI API key is required (use --ai-api-key, ",
                    "VERITY_AI_API_KEY, or OPENAI_API_KEY)"
                )
                .to_owned(),
            })
    }

    fn create_http_client(&self) -> Result<Client, ToolError> {
        Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|error| ToolError::Configuration {
                message: format!("failed to configure AI HTTP client: {error}"),
            })
    }
}

#[async_trait]
impl ChatCompletionService for OpenAiChatCompletionService {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, ToolError> {
        let api_key = self.extract_api_key()?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatCompletionsRequest {
            model: request.model.as_str(),
            temperature: request.temperature,
            messages: vec![
                ChatCompletionsMessage {
                    role: "system",
                    content: request.system.as_str(),
                },
                ChatCompletionsMessage {
                    role: "user",
                    content: request.user.as_str(),
                },
            ],
        };

        let response = self
            .create_http_client()?
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| ToolError::Network {
                message: format!("AI request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), 160),
            );
            return Err(ToolError::Api {
                message: format!("AI request failed with status {}: {body}", status.as_u16()),
            });
        }

        let response_payload: ChatCompletionsResponse =
            response.json().await.map_err(|error| ToolError::Api {
                message: format!("AI response JSON decoding failed: {error}"),
            })?;

        let choice = response_payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::Api {
                message: "AI response did not contain any choices".to_owned(),
            })?;

        let text = parse_content_value(&choice.message.content)
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| ToolError::Api {
                message: "AI response did not contain assistant text".to_owned(),
            })?;

        Ok(ChatCompletion {
            text,
            finish_reason: choice.finish_reason,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatCompletionsMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: ChatContent,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
