//! Run configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credentials used for all device sessions in a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Device login username
    pub username: String,
    /// Device login password
    pub password: String,
}

impl Credentials {
    /// Create device credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Settings for one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Device status filter
    #[serde(default = "default_status")]
    pub status: String,
    /// Tenant filter
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Maximum device polls in flight at once
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Session connect timeout
    #[serde(default = "default_session_timeout")]
    pub connect_timeout: Duration,
    /// Session command timeout
    #[serde(default = "default_session_timeout")]
    pub command_timeout: Duration,
    /// Inter-command delay multiplier for slow device CLIs
    #[serde(default = "default_delay_factor")]
    pub delay_factor: u32,
}

fn default_status() -> String {
    "active".to_string()
}

fn default_tenant() -> String {
    "noc".to_string()
}

fn default_max_in_flight() -> usize {
    10
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_delay_factor() -> u32 {
    3
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            status: default_status(),
            tenant: default_tenant(),
            max_in_flight: default_max_in_flight(),
            connect_timeout: default_session_timeout(),
            command_timeout: default_session_timeout(),
            delay_factor: default_delay_factor(),
        }
    }
}
