//! Review tools runnable against a pull request.
//!
//! Besides the ticket check in [`crate::ticket`], three prompt-driven reviews
//! are available: [`PerformanceReview`], [`TestScenarioReview`] and
//! [`ArchitectureReview`]. Each asks the chat-completion model about the pull
//! request diff and publishes the answer as a comment. The user prompt of
//! each can be replaced per repository by committing a template under
//! `.verity/prompts/`.

mod architecture;
mod performance;
mod pipeline;

use std::fmt;
use std::str::FromStr;

pub use architecture::{
    ARCHITECTURE_PROMPT_PATH, ArchitectureMode, ArchitectureReview, ArchitectureSettings,
    DEFAULT_ARCHITECTURE_BRANCH, DEFAULT_ARCHITECTURE_FILE,
};
pub use check_tests::{CHECK_TESTS_PROMPT_PATH, TestScenarioReview};
pub use performance::{PERFORMANCE_PROMPT_PATH, PerformanceReview};
pub use pipeline::ReviewSettings;

/// Tool selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolKind {
    /// Ticket-resolution verification.
    #[default]
    CheckTicket,
    /// Performance review of the diff.
    Performance,
    /// Test scenario suggestions for the diff.
    CheckTests,
    /// Architecture review with the repository's architecture documents.
    Architecture,
    /// Architecture review prompt rendered without calling the model.
    ArchitecturePrompt,
}

impl ToolKind {
    const NAMES: &'static str =
        "'check-ticket', 'performance', 'check-tests', 'architecture' or 'architecture-prompt'";
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "check-ticket" => Ok(Self::CheckTicket),
            "performance" => Ok(Self::Performance),
            "check-tests" => Ok(Self::CheckTests),
            "architecture" => Ok(Self::Architecture),
            "architecture-prompt" => Ok(Self::ArchitecturePrompt),
            other => Err(format!("unknown tool '{other}' (expected {})", Self::NAMES)),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::CheckTicket => "check-ticket",
            Self::Performance => "performance",
            Self::CheckTests => "check-tests",
            Self::Architecture => "architecture",
            Self::ArchitecturePrompt => "architecture-prompt",
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ToolKind;

    #[rstest]
    #[case(ToolKind::CheckTicket)]
    #[case(ToolKind::Performance)]
    #[case(ToolKind::CheckTests)]
    #[case(ToolKind::Architecture)]
    #[case(ToolKind::ArchitecturePrompt)]
    fn tool_names_parse_back(#[case] kind: ToolKind) {
        assert_eq!(kind.to_string().parse::<ToolKind>(), Ok(kind));
    }

    #[rstest]
    fn unknown_tool_is_rejected() {
        let error = "describe".parse::<ToolKind>().expect_err("unknown tool");

        assert!(error.contains("describe"), "{error}");
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod review_tests;
