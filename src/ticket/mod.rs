//! Ticket-resolution verification.
//!
//! The check reads the last commit message line of a pull request, extracts a
//! `module: id:` ticket reference, fetches the ticket from the bug tracker,
//! decides whether the change resolves it and renders a localised verdict.
//!
//! - [`reference`] extracts the [`CommitReference`]
//! - [`tracker`] fetches the [`Ticket`]
//! - [`ranges`] finds "line N" references and the lines a diff touched
//! - [`judge`] decides resolution through a [`ResolutionJudge`] strategy
//! - [`report`] renders the [`Verdict`]
//! - [`check`] sequences everything in [`TicketCheck`]

pub mod check;
pub mod judge;
pub mod ranges;
pub mod reference;
pub mod report;
pub mod tracker;

pub use check::{TicketCheck, TicketCheckReport, TicketCheckSettings};
pub use judge::{
    AiResolutionJudge, JudgeInput, JudgeStrategy, Judgement, LineOverlapJudge, ResolutionJudge,
};
pub use ranges::{LineRange, extract_line_ranges, touched_lines};
pub use reference::{CommitReference, TicketPattern, last_commit_line};
pub use report::{ReportLocale, Reporter, UnresolvedReason, Verdict};
pub use tracker::{HttpTicketTracker, Ticket, TicketTracker, TrackerError};

#[cfg(test)]
pub use judge::MockResolutionJudge;
#[cfg(test)]
pub use tracker::MockTicketTracker;
