//! Line-numbered rendering of pull request patches.
//!
//! GitHub returns one unified-diff patch per changed file. The ticket check
//! needs to know which source lines a change touched, so every hunk line is
//! prefixed with its file line number ahead of the original marker:
//!
//! ```text
//! ## File: 'src/lib.rs'
//! @@ -10,3 +10,4 @@ fn main() {
//! 10  let a = 1;
//! 11 -let b = 2;
//! 11 +let b = 3;
//! 12 +let c = 4;
//! 13  run(a, b);
//! ```
//!
//! Added and context lines carry new-file numbers; removed lines carry
//! old-file numbers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::models::ChangedFile;

#[expect(clippy::expect_used, reason = "hunk header pattern is a valid literal")]
static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("hunk header regex")
});

/// Annotated diff text for a whole pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument(String);

impl DiffDocument {
    /// Wraps already-annotated diff text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the annotated text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` when no file contributed any diff text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for DiffDocument {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Renders every file patch into one annotated document.
///
/// Files without a patch (binary or too large for GitHub to inline) are
/// skipped.
#[must_use]
pub fn annotate_files(files: &[ChangedFile]) -> DiffDocument {
    let sections: Vec<String> = files
        .iter()
        .filter_map(|file| {
            file.patch
                .as_deref()
                .map(|patch| format!("## File: '{}'\n{}", file.filename, annotate_patch(patch)))
        })
        .collect();

    DiffDocument(sections.join("\n"))
}

/// Prefixes each hunk line of a single unified-diff patch with its line
/// number.
#[must_use]
pub fn annotate_patch(patch: &str) -> String {
    let mut output = String::with_capacity(patch.len());
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;

    for line in patch.lines() {
        if let Some(captures) = HUNK_HEADER.captures(line) {
            old_line = parse_number(captures.get(1).map(|found| found.as_str()));
            new_line = parse_number(captures.get(2).map(|found| found.as_str()));
            push_line(&mut output, line);
            continue;
        }

        match line.chars().next() {
            Some('+') => {
                push_line(&mut output, &format!("{new_line} {line}"));
                new_line = new_line.saturating_add(1);
            }
            Some('-') => {
                push_line(&mut output, &format!("{old_line} {line}"));
                old_line = old_line.saturating_add(1);
            }
            // "\ No newline at end of file"
            Some('\\') => push_line(&mut output, line),
            _ => {
                push_line(&mut output, &format!("{new_line} {line}"));
                old_line = old_line.saturating_add(1);
                new_line = new_line.saturating_add(1);
            }
        }
    }

    output
}

fn parse_number(value: Option<&str>) -> u32 {
    value.and_then(|raw| raw.parse().ok()).unwrap_or(0)
}

fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ChangedFile, annotate_files, annotate_patch};

    const PATCH: &str = "@@ -10,3 +10,4 @@ fn main() {\n let a = 1;\n-let b = 2;\n+let b = 3;\n+let c = 4;\n run(a, b);";

    #[rstest]
    fn numbers_added_lines_with_new_file_positions() {
        let annotated = annotate_patch(PATCH);

        assert!(annotated.contains("11 +let b = 3;"), "{annotated}");
        assert!(annotated.contains("12 +let c = 4;"), "{annotated}");
    }

    #[rstest]
    fn numbers_removed_lines_with_old_file_positions() {
        let annotated = annotate_patch(PATCH);

        assert!(annotated.contains("11 -let b = 2;"), "{annotated}");
    }

    #[rstest]
    fn context_lines_keep_their_blank_marker() {
        let annotated = annotate_patch(PATCH);

        assert!(annotated.contains("10  let a = 1;"), "{annotated}");
        assert!(annotated.contains("13  run(a, b);"), "{annotated}");
    }

    #[rstest]
    fn restarts_numbering_at_each_hunk() {
        let patch = "@@ -1 +1 @@\n-a\n+b\n@@ -40,2 +40,2 @@\n-c\n+d";

        let annotated = annotate_patch(patch);

        assert!(annotated.contains("1 +b"), "{annotated}");
        assert!(annotated.contains("40 +d"), "{annotated}");
        assert!(annotated.contains("40 -c"), "{annotated}");
    }

    #[rstest]
    fn skips_files_without_patch() {
        let files = vec![
            ChangedFile {
                filename: "logo.png".to_owned(),
                status: Some("added".to_owned()),
                patch: None,
            },
            ChangedFile {
                filename: "src/lib.rs".to_owned(),
                status: Some("modified".to_owned()),
                patch: Some("@@ -1 +1 @@\n-a\n+b".to_owned()),
            },
        ];

        let document = annotate_files(&files);

        assert!(!document.as_str().contains("logo.png"));
        assert!(document.as_str().starts_with("## File: 'src/lib.rs'\n"));
    }

    #[rstest]
    fn empty_file_list_yields_empty_document() {
        assert!(annotate_files(&[]).is_empty());
    }
}
