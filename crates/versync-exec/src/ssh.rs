//! SSH device sessions using russh crate

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use russh::keys::ssh_key;
use russh::{ChannelMsg, Disconnect, client};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::traits::{DeviceSession, SessionFactory};

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler;

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Network devices rotate keys on reimage; no known_hosts check
        Ok(true)
    }
}

/// SSH session to a single network device
///
/// Opened through [`SshSessionFactory`], authenticated with username and
/// password, closed explicitly by the caller.
pub struct SshSession {
    /// Device address, kept for logging
    host: String,
    /// Connected SSH handle
    handle: Option<client::Handle<SshClientHandler>>,
    /// Per-command timeout
    command_timeout: std::time::Duration,
    /// Delay applied after each command for slow device CLIs
    settle_delay: std::time::Duration,
}

impl std::fmt::Debug for SshSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshSession")
            .field("host", &self.host)
            .field("connected", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl SshSession {
    /// Connect and authenticate against a device
    ///
    /// # Errors
    /// Returns `SessionError::Timeout` if the connect timeout elapses,
    /// `SessionError::ConnectionFailed` on transport errors, and
    /// `SessionError::AuthenticationFailed` when the device rejects the
    /// credentials.
    #[instrument(skip(config), fields(host = %config.address))]
    pub async fn connect(config: &SessionConfig) -> Result<Self, SessionError> {
        info!(
            host = %config.address,
            port = config.port,
            user = %config.username,
            "connecting to device"
        );

        let ssh_config = Arc::new(client::Config::default());
        let handler = SshClientHandler;

        let mut handle = timeout(
            config.connect_timeout,
            client::connect(
                ssh_config,
                (&config.address[..], config.port),
                handler,
            ),
        )
        .await
        .map_err(|_| SessionError::Timeout {
            timeout: config.connect_timeout,
        })?
        .map_err(|e| SessionError::ConnectionFailed(e.to_string()))?;

        let auth_res = timeout(
            config.connect_timeout,
            handle.authenticate_password(&config.username, &config.password),
        )
        .await
        .map_err(|_| SessionError::Timeout {
            timeout: config.connect_timeout,
        })?
        .map_err(|e| SessionError::AuthenticationFailed(e.to_string()))?;

        if !auth_res.success() {
            return Err(SessionError::AuthenticationFailed(
                "password authentication rejected".to_string(),
            ));
        }

        debug!(host = %config.address, "device session authenticated");

        Ok(Self {
            host: config.address.clone(),
            handle: Some(handle),
            command_timeout: config.command_timeout,
            settle_delay: config.settle_delay(),
        })
    }

    /// Execute one command over an exec channel
    async fn execute(&mut self, command: &str) -> Result<String, SessionError> {
        let handle = self.handle.as_mut().ok_or(SessionError::NotConnected)?;

        let start = Instant::now();

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| SessionError::IoError(e.to_string()))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| SessionError::IoError(e.to_string()))?;

        let mut output = Vec::new();

        loop {
            let msg = channel.wait().await;

            match msg {
                Some(ChannelMsg::Data { data }) => {
                    output.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    // Some device CLIs emit on stderr
                    if ext == 1 {
                        output.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::Eof) | None => break,
                _ => {}
            }
        }

        let duration = start.elapsed();
        let output = String::from_utf8_lossy(&output).to_string();

        debug!(
            host = %self.host,
            command = %command,
            bytes = output.len(),
            duration = ?duration,
            "device command completed"
        );

        Ok(output)
    }
}

#[async_trait]
impl DeviceSession for SshSession {
    #[instrument(skip(self, command), fields(host = %self.host))]
    async fn run(&mut self, command: &str) -> Result<String, SessionError> {
        let result = timeout(self.command_timeout, self.execute(command)).await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                warn!(
                    host = %self.host,
                    command = %command,
                    timeout = ?self.command_timeout,
                    "device command timed out"
                );
                return Err(SessionError::Timeout {
                    timeout: self.command_timeout,
                });
            }
        };

        // Let slow CLIs drain their prompt before the next command
        sleep(self.settle_delay).await;

        Ok(output)
    }

    async fn close(mut self: Box<Self>) -> Result<(), SessionError> {
        if let Some(handle) = self.handle.take() {
            handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
                .map_err(|e| SessionError::IoError(e.to_string()))?;
            debug!(host = %self.host, "device session closed");
        }
        Ok(())
    }

    fn transport(&self) -> &'static str {
        "ssh"
    }
}

/// Factory opening SSH sessions
#[derive(Debug, Clone, Default)]
pub struct SshSessionFactory;

impl SshSessionFactory {
    /// Create a new SSH session factory
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionFactory for SshSessionFactory {
    async fn open(&self, config: &SessionConfig) -> Result<Box<dyn DeviceSession>, SessionError> {
        let session = SshSession::connect(config).await?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    // These tests require a reachable SSH device - marked as ignored
    #[tokio::test]
    #[ignore = "requires SSH-capable device"]
    async fn test_ssh_session() {
        // Placeholder for lab-device SSH tests
    }
}
