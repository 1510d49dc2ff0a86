//! Error types for versync-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during a device session
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// Failed to connect to the device
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication rejected by the device
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Command execution failed
    #[error("command execution failed: {0}")]
    CommandFailed(String),

    /// Connect or command timed out
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// I/O error on the transport
    #[error("I/O error: {0}")]
    IoError(String),

    /// Session is not connected
    #[error("not connected")]
    NotConnected,
}

impl SessionError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SessionError::ConnectionFailed(_) | SessionError::Timeout { .. }
        )
    }
}
