//! Chat-completion contract shared by every tool that consults a model.

use async_trait::async_trait;

use crate::error::ToolError;

/// One chat-completion request: a rendered system/user prompt pair plus the
/// sampling settings taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Rendered system prompt.
    pub system: String,
    /// Rendered user prompt.
    pub user: String,
}

/// Assistant reply returned by a chat-completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    /// Assistant text.
    pub text: String,
    /// Provider-reported reason the generation stopped, when present.
    pub finish_reason: Option<String>,
}

/// A chat-completion provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Sends one request and returns the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the provider call fails or the response
    /// carries no assistant text.
    async fn complete(&self, request: &ChatCompletionRequest)
    -> Result<ChatCompletion, ToolError>;
}
