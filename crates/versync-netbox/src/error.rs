//! Error types for the NetBox client

use thiserror::Error;

/// Errors that can occur when talking to the NetBox API
#[derive(Error, Debug)]
pub enum NetboxError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// API returned an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },
}

/// Result type for NetBox operations
pub type Result<T> = std::result::Result<T, NetboxError>;
