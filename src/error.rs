//! Error types shared by the review tools.

use thiserror::Error;

/// Errors surfaced while configuring a tool or talking to its collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// The CLI did not include a pull request URL.
    #[error("pull request URL is required")]
    MissingPullRequestUrl,

    /// The provided URL could not be parsed.
    #[error("pull request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The pull request path is incomplete.
    #[error("pull request URL must match /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// A remote API returned an error or an unexpected payload.
    #[error("API error: {message}")]
    Api {
        /// Description of the failure, including the response body when known.
        message: String,
    },

    /// Networking failed while calling a remote service.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or holds an invalid value.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A prompt template failed to parse or referenced an undefined value.
    #[error("template error in '{name}': {message}")]
    Template {
        /// Name of the template being rendered.
        name: String,
        /// Rendering failure reported by the template engine.
        message: String,
    },
}
