//! Ticket check orchestration.
//!
//! [`TicketCheck::run`] sequences the check:
//!
//! 1. read the last commit line and extract a ticket reference
//! 2. stop with an informational verdict when there is no reference or no
//!    tracker URL
//! 3. fetch the ticket, stopping with a warning when that fails
//! 4. fetch the diff once and hand everything to the [`ResolutionJudge`]
//! 5. render the verdict and optionally publish it
//!
//! Failures of collaborators are logged and folded into the verdict; `run`
//! itself never fails.

use crate::github::{DiffDocument, GitProvider};

use super::judge::{JudgeInput, ResolutionJudge};
use super::reference::{CommitReference, TicketPattern, last_commit_line};
use super::report::{ReportLocale, Reporter, UnresolvedReason, Verdict};
use super::tracker::TicketTracker;

/// Per-run settings of the ticket check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCheckSettings {
    /// Reference extraction rule.
    pub pattern: TicketPattern,
    /// Resolved tracker base URL.
    pub tracker_url: Option<String>,
    /// Publishes the final message as a pull request comment.
    pub publish_output: bool,
    /// Publishes judge artefacts before the final message whenever
    /// `publish_output` is set. On by default.
    pub publish_artifacts: bool,
    /// Language of the final message.
    pub locale: ReportLocale,
}

impl Default for TicketCheckSettings {
    fn default() -> Self {
        Self {
            pattern: TicketPattern::default(),
            tracker_url: None,
            publish_output: false,
            publish_artifacts: true,
            locale: ReportLocale::default(),
        }
    }
}

/// Result of [`TicketCheck::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCheckReport {
    /// Structured outcome.
    pub verdict: Verdict,
    /// Rendered message, identical to the published comment.
    pub message: String,
}

/// Ticket-resolution check for one pull request.
pub struct TicketCheck<'a> {
    provider: &'a dyn GitProvider,
    tracker: &'a dyn TicketTracker,
    judge: &'a dyn ResolutionJudge,
    settings: TicketCheckSettings,
}

impl<'a> TicketCheck<'a> {
    /// Wires the check to its collaborators.
    #[must_use]
    pub fn new(
        provider: &'a dyn GitProvider,
        tracker: &'a dyn TicketTracker,
        judge: &'a dyn ResolutionJudge,
        settings: TicketCheckSettings,
    ) -> Self {
        Self {
            provider,
            tracker,
            judge,
            settings,
        }
    }

    /// Runs the check and returns the verdict with its rendered message.
    pub async fn run(&self) -> TicketCheckReport {
        let (verdict, artifacts) = self.decide().await;
        let message = Reporter::new(self.settings.locale).render(&verdict);
        tracing::info!(solved = verdict.is_solved(), "ticket check finished");

        if self.settings.publish_output {
            if self.settings.publish_artifacts {
                for artifact in &artifacts {
                    self.publish(artifact).await;
                }
            }
            self.publish(&message).await;
        }

        TicketCheckReport { verdict, message }
    }

    async fn decide(&self) -> (Verdict, Vec<String>) {
        let commit_message = self.load_commit_line().await;
        let reference = CommitReference::extract(&commit_message, self.settings.pattern);

        if reference.is_empty() {
            tracing::info!(%commit_message, "no ticket reference in last commit line");
            return (
                Verdict::Unresolved(UnresolvedReason::NoTicketReferenced {
                    commit_message,
                    tracker_url: self.settings.tracker_url.clone(),
                }),
                Vec::new(),
            );
        }

        let ticket_id = reference.ticket_id;
        let Some(tracker_url) = self.settings.tracker_url.as_deref() else {
            tracing::warn!(%ticket_id, "no bug tracker URL configured");
            return (
                Verdict::Unresolved(UnresolvedReason::NoTrackerConfigured { ticket_id }),
                Vec::new(),
            );
        };

        let ticket = match self.tracker.fetch(&ticket_id, tracker_url).await {
            Ok(ticket) => ticket,
            Err(error) => {
                tracing::error!(
                    %ticket_id,
                    request_url = %error.request_url,
                    raw_response = error.raw_response.as_deref().unwrap_or_default(),
                    reason = %error.message,
                    "failed to fetch ticket"
                );
                return (
                    Verdict::Unresolved(UnresolvedReason::fetch_failed(&ticket_id, error)),
                    Vec::new(),
                );
            }
        };

        let input = JudgeInput {
            description: ticket.description,
            commit_message,
            diff: self.diff().await,
        };
        let judgement = self.judge.judge(&input).await;
        let verdict = if judgement.solved {
            Verdict::Solved { ticket_id }
        } else {
            Verdict::NotSolved { ticket_id }
        };
        (verdict, judgement.artifacts)
    }

    async fn load_commit_line(&self) -> String {
        self.provider.commit_messages().await.map_or_else(
            |error| {
                tracing::warn!(%error, "failed to load commit messages");
                String::new()
            },
            |messages| last_commit_line(&messages),
        )
    }

    async fn diff(&self) -> DiffDocument {
        self.provider.diff().await.unwrap_or_else(|error| {
            tracing::error!(%error, "failed to get diff");
            DiffDocument::default()
        })
    }

    async fn publish(&self, body: &str) {
        if let Err(error) = self.provider.publish_comment(body).await {
            tracing::warn!(%error, "failed to publish ticket check comment");
        }
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
