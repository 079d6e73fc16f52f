//! Bug-tracker base URL resolution.
//!
//! Sources are consulted in order and the first non-empty value wins:
//!
//! 1. the explicit `bugtracker_url` configuration field
//! 2. the `BUGTRACKER_URL` key of the JSON file named by
//!    `bugtracker_config_file`
//! 3. the environment variables in [`TRACKER_URL_VARIABLES`]
//!
//! A missing URL is not an error; the ticket check reports it as an
//! informational verdict instead.

use std::env;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;

use crate::error::ToolError;

/// Key looked up in the JSON tracker configuration file.
pub const TRACKER_URL_KEY: &str = "BUGTRACKER_URL";

/// Environment variables holding the tracker base URL, in lookup order.
pub const TRACKER_URL_VARIABLES: [&str; 3] = ["BUGTRACKER_URL", "BUGTRACKER.URL", "BUGTRACKER__URL"];

/// Resolves the tracker base URL from the explicit value, the optional JSON
/// file, then the environment.
///
/// # Errors
///
/// Returns [`ToolError::Configuration`] when `config_file` is set but cannot
/// be read or does not contain a JSON document.
pub fn resolve_tracker_url(
    explicit: Option<&str>,
    config_file: Option<&Utf8Path>,
) -> Result<Option<String>, ToolError> {
    if let Some(url) = non_blank(explicit) {
        return Ok(Some(url));
    }

    if let Some(path) = config_file
        && let Some(url) = read_tracker_file(path)?
    {
        return Ok(Some(url));
    }

    Ok(tracker_url_from_env())
}

/// First non-empty value among [`TRACKER_URL_VARIABLES`].
#[must_use]
pub fn tracker_url_from_env() -> Option<String> {
    TRACKER_URL_VARIABLES
        .iter()
        .find_map(|name| non_blank(env::var(name).ok().as_deref()))
}

/// Reads the `BUGTRACKER_URL` key from a JSON file.
///
/// Returns `Ok(None)` when the document has no usable string under the key.
///
/// # Errors
///
/// Returns [`ToolError::Configuration`] when the file cannot be read or
/// parsed.
pub fn read_tracker_file(path: &Utf8Path) -> Result<Option<String>, ToolError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| ToolError::Configuration {
        message: format!("invalid tracker config path '{path}': no file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        ToolError::Configuration {
            message: format!("failed to open tracker config directory '{parent}': {error}"),
        }
    })?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|error| ToolError::Configuration {
            message: format!("failed to read tracker config '{path}': {error}"),
        })?;

    let document: Value =
        serde_json::from_str(&content).map_err(|error| ToolError::Configuration {
            message: format!("failed to parse tracker config '{path}': {error}"),
        })?;

    Ok(non_blank(document.get(TRACKER_URL_KEY).and_then(Value::as_str)))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToOwned::to_owned)
}
