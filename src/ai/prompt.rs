//! Strict Jinja2-compatible prompt rendering.
//!
//! Prompt templates come from configuration or from files in the reviewed
//! repository, so a typo in a variable name must fail the render instead of
//! silently producing an empty string. Rendering uses `minijinja` with
//! [`UndefinedBehavior::Strict`] and auto-escaping disabled.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::ToolError;

/// A system/user template pair for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// System prompt template source.
    pub system: String,
    /// User prompt template source.
    pub user: String,
}

impl PromptTemplate {
    /// Creates a template pair.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Renders both templates against the same context.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Template`] when either template fails to parse
    /// or references an undefined variable.
    pub fn render<S: Serialize>(&self, context: &S) -> Result<RenderedPrompt, ToolError> {
        Ok(RenderedPrompt {
            system: render_prompt("system", &self.system, context)?,
            user: render_prompt("user", &self.user, context)?,
        })
    }
}

/// Output of [`PromptTemplate::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// Rendered system prompt.
    pub system: String,
    /// Rendered user prompt.
    pub user: String,
}

/// Renders one template source with strict undefined handling.
///
/// # Errors
///
/// Returns [`ToolError::Template`] naming `name` when the source has a syntax
/// error or references a variable missing from `context`.
pub fn render_prompt<S: Serialize>(
    name: &str,
    source: &str,
    context: &S,
) -> Result<String, ToolError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    env.render_str(source, context)
        .map_err(|error| ToolError::Template {
            name: name.to_owned(),
            message: error.to_string(),
        })
}
