//! Verdicts of the ticket check and their localised messages.

use std::fmt;
use std::str::FromStr;

use super::tracker::TrackerError;

/// Why a ticket could not be judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The last commit line carries no ticket reference.
    NoTicketReferenced {
        /// The inspected commit line.
        commit_message: String,
        /// Tracker base URL, when one is configured.
        tracker_url: Option<String>,
    },
    /// A ticket was referenced but no tracker URL is configured.
    NoTrackerConfigured {
        /// Referenced ticket.
        ticket_id: String,
    },
    /// The tracker request failed.
    TrackerFetchFailed {
        /// Referenced ticket.
        ticket_id: String,
        /// Request URL that failed.
        request_url: String,
        /// Raw response body, when one arrived.
        raw_response: Option<String>,
    },
}

impl UnresolvedReason {
    /// Builds the fetch-failure reason from a tracker error.
    #[must_use]
    pub fn fetch_failed(ticket_id: &str, error: TrackerError) -> Self {
        Self::TrackerFetchFailed {
            ticket_id: ticket_id.to_owned(),
            request_url: error.request_url,
            raw_response: error.raw_response,
        }
    }
}

/// Final outcome of a ticket check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The check stopped before judging.
    Unresolved(UnresolvedReason),
    /// The change resolves the ticket.
    Solved {
        /// Judged ticket.
        ticket_id: String,
    },
    /// The change does not resolve the ticket.
    NotSolved {
        /// Judged ticket.
        ticket_id: String,
    },
}

impl Verdict {
    /// Returns `true` only for [`Verdict::Solved`].
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }
}

/// Language of rendered verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportLocale {
    /// Russian, the tracker's working language.
    #[default]
    Russian,
    /// English.
    English,
}

impl FromStr for ReportLocale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Self::Russian),
            "en" => Ok(Self::English),
            other => Err(format!(
                "unknown report locale '{other}' (expected 'ru' or 'en')"
            )),
        }
    }
}

impl fmt::Display for ReportLocale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Russian => "ru",
            Self::English => "en",
        })
    }
}

/// Renders verdicts as comment text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    locale: ReportLocale,
}

impl Reporter {
    /// Creates a reporter for `locale`.
    #[must_use]
    pub const fn new(locale: ReportLocale) -> Self {
        Self { locale }
    }

    /// Renders `verdict`. The same verdict always yields the same text.
    #[must_use]
    pub fn render(&self, verdict: &Verdict) -> String {
        match self.locale {
            ReportLocale::Russian => render_russian(verdict),
            ReportLocale::English => render_english(verdict),
        }
    }
}

fn render_russian(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Unresolved(UnresolvedReason::NoTicketReferenced {
            commit_message,
            tracker_url,
        }) => format!(
            "\u{2139}\u{fe0f} Не найдено ID тикета в описании коммита {commit_message} -> {}",
            tracker_url.as_deref().unwrap_or_default()
        ),
        Verdict::Unresolved(UnresolvedReason::NoTrackerConfigured { ticket_id }) => {
            format!("⚠️ BUGTRACKER_URL не найден для тикета {ticket_id}")
        }
        Verdict::Unresolved(UnresolvedReason::TrackerFetchFailed {
            ticket_id,
            request_url,
            raw_response,
        }) => format!(
            "⚠️ Не удалось получить данные тикета {ticket_id} URL: {request_url} Ответ (raw): {}",
            raw_response.as_deref().unwrap_or_default()
        ),
        Verdict::Solved { ticket_id } => {
            format!("✅ Проблема из тикета {ticket_id} решена в этом коммите.")
        }
        Verdict::NotSolved { ticket_id } => format!(
            "⚠️ Проблема из тикета {ticket_id} не решена или не затронута в этом коммите."
        ),
    }
}

fn render_english(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Unresolved(UnresolvedReason::NoTicketReferenced {
            commit_message,
            tracker_url,
        }) => format!(
            "\u{2139}\u{fe0f} No ticket ID found in commit message {commit_message} -> {}",
            tracker_url.as_deref().unwrap_or_default()
        ),
        Verdict::Unresolved(UnresolvedReason::NoTrackerConfigured { ticket_id }) => {
            format!("⚠️ BUGTRACKER_URL is not configured for ticket {ticket_id}")
        }
        Verdict::Unresolved(UnresolvedReason::TrackerFetchFailed {
            ticket_id,
            request_url,
            raw_response,
        }) => format!(
            "⚠️ Failed to fetch ticket {ticket_id} URL: {request_url} Raw response: {}",
            raw_response.as_deref().unwrap_or_default()
        ),
        Verdict::Solved { ticket_id } => {
            format!("✅ The issue from ticket {ticket_id} is resolved in this commit.")
        }
        Verdict::NotSolved { ticket_id } => format!(
            "⚠️ The issue from ticket {ticket_id} is not resolved or not addressed in this commit."
        ),
    }
}
