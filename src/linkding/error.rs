//! Error types for Linkding API calls.

use thiserror::Error;

/// Result type for Linkding API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the Linkding API.
///
/// Every variant is terminal for the call that produced it; the client never
/// retries.
///
/// # Security Note
///
/// No variant carries the API token. Transport errors come from reqwest,
/// which does not echo request headers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response body could not be read.
    #[error("request failed: {source}")]
    Transport {
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the client timeout.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout.
        seconds: u64,
    },

    /// Linkding answered with a status other than the one the operation expects.
    #[error("API request failed with status {status}")]
    Status {
        /// The HTTP status code received.
        status: u16,
    },

    /// The response body was not the JSON the operation expects.
    #[error("failed to decode response: {source}")]
    Decode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot be used.
    #[error("invalid Linkding URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The API token contains characters not allowed in an HTTP header.
    #[error("API token is not a valid header value")]
    InvalidToken,
}

impl ApiError {
    /// Returns the HTTP status code for [`ApiError::Status`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the call failed before a response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}
