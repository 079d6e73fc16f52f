//! Octocrab client construction for the GitHub provider.

use http::Uri;
use octocrab::Octocrab;

use crate::error::ToolError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `ToolError::InvalidUrl` when the base URI cannot be parsed or
/// `ToolError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, ToolError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ToolError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| ToolError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
