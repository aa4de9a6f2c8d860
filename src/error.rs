//! Error types for K3Cloud client operations

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for K3Cloud client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during K3Cloud client operations
///
/// None of these are retried internally; each carries enough context
/// (status code, raw body, or underlying cause) to diagnose without
/// re-running the call.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing or invalid configuration, raised before any network call
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// Network-level failure: DNS, connection refused, timeout
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with HTTP status >= 400
    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Body carries an HTML document signature where JSON was expected.
    /// Usually a reverse proxy or gateway error page in front of the API.
    #[error("server returned an HTML error page: {0}")]
    UnexpectedContent(String),

    /// A chunk's decoded response reported failure; carries the raw
    /// chunk response. The remaining chunks are abandoned and the upload
    /// must be restarted from chunk 0.
    #[error("chunk upload rejected: {0}")]
    Upload(String),

    /// Endpoint could not be joined onto the base URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Create an HTTP status error from status code and raw body
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }
}
