//! Bug-tracker client fetching ticket descriptions.
//!
//! The tracker exposes a single endpoint:
//!
//! ```text
//! GET {base}/rest.php?action=get_ticket_by_id&id={ticket_id}
//! -> {"description": "...", ...}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::error::ToolError;

/// Fixed request timeout for tracker calls.
pub const TRACKER_TIMEOUT: Duration = Duration::from_secs(10);

const TICKET_ACTION: &str = "get_ticket_by_id";

/// Ticket record returned by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ticket {
    /// Ticket identifier as referenced in the commit.
    pub id: String,
    /// Free-form description; empty when the tracker omits it.
    pub description: String,
}

/// Failure to obtain a ticket from the tracker.
///
/// Carries the request URL and, when a response arrived, its raw body so
/// the failure can be reported without reproducing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch ticket from {request_url}: {message}")]
pub struct TrackerError {
    /// Fully qualified request URL, including the query string.
    pub request_url: String,
    /// Raw response body, when one was received.
    pub raw_response: Option<String>,
    /// Human-readable failure reason.
    pub message: String,
}

/// Source of ticket records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketTracker: Send + Sync {
    /// Fetches the ticket `ticket_id` from the tracker rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] on transport failure, timeout, a non-success
    /// status, or a body that is not JSON.
    async fn fetch(&self, ticket_id: &str, base_url: &str) -> Result<Ticket, TrackerError>;
}

/// HTTP implementation of [`TicketTracker`].
#[derive(Debug, Clone)]
pub struct HttpTicketTracker {
    client: Client,
}

impl HttpTicketTracker {
    /// Creates a tracker client with the fixed ten second timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new() -> Result<Self, ToolError> {
        Self::with_timeout(TRACKER_TIMEOUT)
    }

    pub(crate) fn with_timeout(timeout: Duration) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ToolError::Configuration {
                message: format!("failed to configure tracker HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }
}

/// Builds the ticket lookup URL for `base_url`.
///
/// # Errors
///
/// Returns [`TrackerError`] when `base_url` is not an absolute URL.
pub fn ticket_url(base_url: &str, ticket_id: &str) -> Result<Url, TrackerError> {
    let endpoint = format!("{}/rest.php", base_url.trim_end_matches('/'));
    Url::parse_with_params(&endpoint, [("action", TICKET_ACTION), ("id", ticket_id)]).map_err(
        |error| TrackerError {
            request_url: endpoint,
            raw_response: None,
            message: format!("invalid tracker URL: {error}"),
        },
    )
}

/// Reads the ticket description out of a decoded tracker response.
///
/// Strings are used verbatim, `null` or a missing key become empty, other
/// JSON values are kept as their JSON text, and non-object documents yield
/// an empty description.
#[must_use]
pub fn description_from(document: &Value) -> String {
    match document.get("description") {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl TicketTracker for HttpTicketTracker {
    async fn fetch(&self, ticket_id: &str, base_url: &str) -> Result<Ticket, TrackerError> {
        let url = ticket_url(base_url, ticket_id)?;
        let request_url = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| TrackerError {
                request_url: request_url.clone(),
                raw_response: None,
                message: format!("tracker request failed: {error}"),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| TrackerError {
            request_url: request_url.clone(),
            raw_response: None,
            message: format!("failed to read tracker response: {error}"),
        })?;

        if !status.is_success() {
            return Err(TrackerError {
                request_url,
                raw_response: Some(body),
                message: format!("tracker responded with status {}", status.as_u16()),
            });
        }

        let document: Value = serde_json::from_str(&body).map_err(|error| TrackerError {
            request_url: request_url.clone(),
            raw_response: Some(body.clone()),
            message: format!("tracker response is not JSON: {error}"),
        })?;

        tracing::debug!(ticket_id, %request_url, "fetched ticket");
        Ok(Ticket {
            id: ticket_id.to_owned(),
            description: description_from(&document),
        })
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
