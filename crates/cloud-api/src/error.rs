//! Error types for API calls.

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is unusable.
    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request to {path} failed: {source}")]
    Transport {
        /// API path of the request.
        path: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{path} returned {status}: {message}")]
    Status {
        /// API path of the request.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The response body did not match the expected model.
    #[error("failed to decode response of {path}: {source}")]
    Decode {
        /// API path of the request.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Whether the API reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
