//! Device session traits

use async_trait::async_trait;

use crate::config::SessionConfig;
use crate::error::SessionError;

/// An open command session to a single device
#[async_trait]
pub trait DeviceSession: Send {
    /// Run one command and return its raw output
    async fn run(&mut self, command: &str) -> Result<String, SessionError>;

    /// Close the session. Errors on close are not actionable for callers
    /// beyond logging, so the session is consumed either way.
    async fn close(self: Box<Self>) -> Result<(), SessionError>;

    /// Transport name for logging
    fn transport(&self) -> &'static str;
}

/// Factory opening sessions per device
///
/// The seam that lets the poll engine run against simulated devices in
/// tests while production wires in SSH.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a session to the device described by `config`
    async fn open(&self, config: &SessionConfig) -> Result<Box<dyn DeviceSession>, SessionError>;
}
