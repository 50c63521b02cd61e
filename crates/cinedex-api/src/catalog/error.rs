//! Error type for catalog requests.

use reqwest::StatusCode;

/// Failure of a single catalog request.
///
/// Listing operations swallow it; [`details`](super::LocalCatalogApi::details)
/// hands it to the caller.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum FetchError {
    /// The endpoint URL could not be built.
    #[error("invalid endpoint URL for {path}: {reason}")]
    Url {
        /// Endpoint path that failed.
        path: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// Transport-level failure (connect, timeout, body read).
    #[error("request failed: {path}")]
    Request {
        /// Endpoint path that failed.
        path: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status.
        status: StatusCode,
        /// Provider `status_message`, or the raw body.
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode JSON response: {path}")]
    Decode {
        /// Endpoint path that failed.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Returns the HTTP status for provider-side failures.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
