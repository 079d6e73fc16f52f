//! Line references in ticket descriptions and the lines a diff touched.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::github::DiffDocument;

#[expect(clippy::expect_used, reason = "line reference pattern is a valid literal")]
static LINE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:lines?|строк(?:а|е|и|у|ой))\s+(\d+)(?:\s*[-–]\s*(\d+))?")
        .expect("line reference regex")
});

#[expect(clippy::expect_used, reason = "touched line pattern is a valid literal")]
static TOUCHED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+) [+-]").expect("touched line regex"));

/// Inclusive range of source lines cited by a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First cited line.
    pub start: u32,
    /// Last cited line, never below `start`.
    pub end: u32,
}

impl LineRange {
    /// Creates a range, swapping the bounds when given in reverse.
    #[must_use]
    pub const fn new(first: u32, second: u32) -> Self {
        if first <= second {
            Self {
                start: first,
                end: second,
            }
        } else {
            Self {
                start: second,
                end: first,
            }
        }
    }

    /// Returns `true` when any line of the range is in `touched`.
    #[must_use]
    pub fn overlaps(&self, touched: &BTreeSet<u32>) -> bool {
        touched.range(self.start..=self.end).next().is_some()
    }
}

/// Extracts "line N" and "line N-M" references, English or Russian, in
/// order of appearance.
///
/// References whose numbers do not fit in `u32` are skipped.
#[must_use]
pub fn extract_line_ranges(description: &str) -> Vec<LineRange> {
    LINE_REFERENCE
        .captures_iter(description)
        .filter_map(|captures| {
            let start = captures.get(1)?.as_str().parse::<u32>().ok()?;
            let end = captures
                .get(2)
                .map_or(Some(start), |found| found.as_str().parse::<u32>().ok())?;
            Some(LineRange::new(start, end))
        })
        .collect()
}

/// Line numbers of added or removed lines in an annotated diff.
///
/// The change marker must directly follow the single separating space, so
/// context lines whose content starts with `+` or `-` are not counted.
#[must_use]
pub fn touched_lines(diff: &DiffDocument) -> BTreeSet<u32> {
    TOUCHED_LINE
        .captures_iter(diff.as_str())
        .filter_map(|captures| captures.get(1)?.as_str().parse::<u32>().ok())
        .collect()
}
