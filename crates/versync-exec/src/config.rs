//! Session configuration for device connections

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base inter-command settle delay, scaled by the delay factor
const BASE_COMMAND_DELAY: Duration = Duration::from_millis(100);

/// Connection settings for a single device session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Device address (IP, no mask)
    pub address: String,
    /// Port (default 22)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Timeout for establishing and authenticating the connection
    #[serde(default = "default_timeout")]
    pub connect_timeout: Duration,
    /// Timeout for a single command execution
    #[serde(default = "default_timeout")]
    pub command_timeout: Duration,
    /// Multiplier for the inter-command settle delay. Slow device CLIs
    /// need extra time before the next command is issued.
    #[serde(default = "default_delay_factor")]
    pub delay_factor: u32,
}

fn default_port() -> u16 {
    22
}

fn default_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_delay_factor() -> u32 {
    3
}

impl SessionConfig {
    /// Create session config with default timeouts
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            port: default_port(),
            username: username.into(),
            password: password.into(),
            connect_timeout: default_timeout(),
            command_timeout: default_timeout(),
            delay_factor: default_delay_factor(),
        }
    }

    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set command timeout
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set delay factor
    #[must_use]
    pub fn with_delay_factor(mut self, factor: u32) -> Self {
        self.delay_factor = factor;
        self
    }

    /// Settle delay applied after each command
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        BASE_COMMAND_DELAY * self.delay_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("192.0.2.1", "admin", "secret");

        assert_eq!(config.port, 22);
        assert_eq!(config.connect_timeout, Duration::from_secs(15));
        assert_eq!(config.command_timeout, Duration::from_secs(15));
        assert_eq!(config.delay_factor, 3);
    }

    #[test]
    fn test_settle_delay_scales_with_factor() {
        let config = SessionConfig::new("192.0.2.1", "admin", "secret").with_delay_factor(3);
        assert_eq!(config.settle_delay(), Duration::from_millis(300));

        let config = config.with_delay_factor(1);
        assert_eq!(config.settle_delay(), Duration::from_millis(100));
    }
}
