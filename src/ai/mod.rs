//! Language-model integration: chat completion and prompt rendering.

mod completion;
mod openai;
mod prompt;

pub use completion::{ChatCompletion, ChatCompletionRequest, ChatCompletionService};
pub use openai::{OpenAiChatCompletionService, OpenAiConfig};
pub use prompt::{PromptTemplate, RenderedPrompt, render_prompt};

#[cfg(test)]
pub use completion::MockChatCompletionService;
