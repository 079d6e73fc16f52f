//! Output formatting utilities for CLI operations.

use std::io::Write;

use verity::ToolError;

/// Writes the tool output followed by a newline; writes nothing when the
/// tool produced no output.
///
/// # Errors
///
/// Returns [`ToolError::Io`] when the writer fails.
pub fn write_tool_output<W: Write>(writer: &mut W, output: Option<&str>) -> Result<(), ToolError> {
    let Some(text) = output else {
        return Ok(());
    };

    writeln!(writer, "{text}").map_err(|error| ToolError::Io {
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::write_tool_output;

    #[rstest]
    #[case::text(Some("✅ done"), "✅ done\n")]
    #[case::nothing(None, "")]
    fn writes_output_with_trailing_newline(#[case] output: Option<&str>, #[case] expected: &str) {
        let mut buffer = Vec::new();

        write_tool_output(&mut buffer, output).expect("write should succeed");

        assert_eq!(String::from_utf8(buffer).expect("UTF-8 output"), expected);
    }
}
