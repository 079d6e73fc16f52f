//! Ticket reference extraction from commit messages.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

#[expect(clippy::expect_used, reason = "ticket patterns are valid literals")]
static PLAIN_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\w+):\s*(\d+):").expect("plain reference regex"));

#[expect(clippy::expect_used, reason = "ticket patterns are valid literals")]
static BUGS_TAG_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\w+):\s*(\d+):\s*\[bugs\]").expect("bugs-tag reference regex")
});

#[expect(clippy::expect_used, reason = "ordinal pattern is a valid literal")]
static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("ordinal prefix regex"));

/// Rule used to recognise a ticket reference in a commit line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TicketPattern {
    /// `module: id:` anywhere in the line.
    #[default]
    Plain,
    /// `module: id: [BUGS]`; references without the tag are ignored.
    BugsTag,
}

impl TicketPattern {
    fn regex(self) -> &'static Regex {
        match self {
            Self::Plain => LazyLock::force(&PLAIN_REFERENCE),
            Self::BugsTag => LazyLock::force(&BUGS_TAG_REFERENCE),
        }
    }
}

impl FromStr for TicketPattern {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "bugs-tag" => Ok(Self::BugsTag),
            other => Err(format!(
                "unknown ticket pattern '{other}' (expected 'plain' or 'bugs-tag')"
            )),
        }
    }
}

impl fmt::Display for TicketPattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Plain => "plain",
            Self::BugsTag => "bugs-tag",
        })
    }
}

/// Module and ticket identifier named by a commit line.
///
/// Both fields are empty when the line carries no reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReference {
    /// Module token preceding the identifier.
    pub module: String,
    /// Numeric ticket identifier, kept as text.
    pub ticket_id: String,
}

impl CommitReference {
    /// Extracts the first reference matching `pattern` from `line`.
    #[must_use]
    pub fn extract(line: &str, pattern: TicketPattern) -> Self {
        pattern
            .regex()
            .captures(line)
            .map(|captures| Self {
                module: capture_text(&captures, 1),
                ticket_id: capture_text(&captures, 2),
            })
            .unwrap_or_default()
    }

    /// Returns `true` when no ticket identifier was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ticket_id.is_empty()
    }
}

fn capture_text(captures: &regex::Captures<'_>, index: usize) -> String {
    captures
        .get(index)
        .map(|found| found.as_str().to_owned())
        .unwrap_or_default()
}

/// Returns the last non-blank line of newline-joined commit messages,
/// trimmed and with a leading `"<digits>. "` ordinal removed.
#[must_use]
pub fn last_commit_line(messages: &str) -> String {
    messages
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(|line| ORDINAL_PREFIX.replace(line, "").into_owned())
        .unwrap_or_default()
}
