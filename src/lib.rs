//! Verity: pull request review tools with ticket-resolution verification.
//!
//! The library checks whether a pull request resolves the bug-tracker
//! ticket named in its last commit line, and offers prompt-driven
//! performance and test-scenario reviews. Git hosting goes through Octocrab
//! behind [`GitProvider`], language models through
//! [`ChatCompletionService`], and the tracker through [`TicketTracker`].

pub mod ai;
pub mod config;
pub mod error;
pub mod github;
pub mod telemetry;
pub mod ticket;
pub mod tools;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use ai::{ChatCompletionService, OpenAiChatCompletionService};
pub use config::VerityConfig;
pub use error::ToolError;
pub use github::{GitProvider, OctocrabGitProvider, PersonalAccessToken, PullRequestLocator};
pub use ticket::{
    AiResolutionJudge, HttpTicketTracker, JudgeStrategy, LineOverlapJudge, ResolutionJudge,
    TicketCheck, TicketCheckReport, TicketCheckSettings, TicketTracker, Verdict,
};
pub use tools::{ArchitectureReview, PerformanceReview, TestScenarioReview, ToolKind};
