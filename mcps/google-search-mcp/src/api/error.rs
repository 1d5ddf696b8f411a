//! Error types for Custom Search API calls

use thiserror::Error;

/// Errors returned by [`super::CustomSearchClient`]
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection, TLS, or timeout failure while talking to the endpoint.
    /// Never carries the request URL, which holds the API key.
    #[error("{0}")]
    Transport(reqwest::Error),

    /// The endpoint answered with an error status or error envelope
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status (or the `error.code` of the envelope)
        status: u16,
        /// Google's error message, or the raw body if it had none
        message: String,
    },

    /// The base URL could not be parsed
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response body was not the JSON shape we expect
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.without_url())
    }
}

impl ApiError {
    /// Whether the failure happened on the wire or at the API, as opposed to
    /// locally (bad URL, undecodable body)
    pub fn is_remote(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Status { .. })
    }
}

/// Result type alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;
