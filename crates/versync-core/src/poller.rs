//! Single-device version poll

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use versync_exec::{SessionConfig, SessionError, SessionFactory};
use versync_netbox::Device;

use crate::config::{Credentials, SyncConfig};
use crate::extract::extract_version;
use crate::platform::Platform;

/// How a single device poll ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// Version extracted and recorded in the shared table
    Recorded,
    /// Platform has no extraction rule; no session was opened
    Unsupported,
    /// Command ran but no version token matched
    NoData,
    /// Session failed to open, authenticate, or execute
    Failed,
}

/// Everything the poller needs to know about one device
#[derive(Debug, Clone)]
pub struct PollTarget {
    /// Device address (IP, no mask)
    pub address: String,
    /// Display name for logging
    pub display: String,
    /// NetBox platform slug, absent for unclassified devices
    pub platform_slug: Option<String>,
}

impl PollTarget {
    /// Build a poll target from an inventory record. Returns `None` for
    /// devices without a primary IP, which cannot be polled.
    #[must_use]
    pub fn from_device(device: &Device) -> Option<Self> {
        let address = device.address()?.to_string();
        Some(Self {
            address,
            display: device.display.clone(),
            platform_slug: device.platform_slug().map(str::to_string),
        })
    }
}

/// Poll one device and record its version in the shared table
///
/// Opens a session through `factory`, runs the platform's version command,
/// extracts the version token, and inserts `address -> version`. The lock
/// on `table` is held only across the insert. The session is closed on
/// every exit path.
///
/// # Errors
/// Propagates session failures (connect, auth, exec) to the coordinator
/// after logging them with device context. A missing extraction rule or a
/// non-matching pattern is a skip, not an error.
#[instrument(skip_all, fields(host = %target.address, device = %target.display))]
pub async fn poll_device(
    factory: &dyn SessionFactory,
    credentials: &Credentials,
    config: &SyncConfig,
    target: &PollTarget,
    table: &Mutex<HashMap<String, String>>,
) -> Result<PollStatus, SessionError> {
    let platform = match target.platform_slug.as_deref().map(Platform::from_slug) {
        Some(Some(platform)) => platform,
        _ => {
            debug!(
                platform = target.platform_slug.as_deref().unwrap_or("<none>"),
                "skipping device: unsupported platform"
            );
            return Ok(PollStatus::Unsupported);
        }
    };

    let session_config = SessionConfig::new(
        &target.address,
        &credentials.username,
        &credentials.password,
    )
    .with_connect_timeout(config.connect_timeout)
    .with_command_timeout(config.command_timeout)
    .with_delay_factor(config.delay_factor);

    let mut session = match factory.open(&session_config).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "failed to open device session");
            return Err(e);
        }
    };

    let output = match session.run(platform.version_command()).await {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "version command failed");
            if let Err(close_err) = session.close().await {
                debug!(error = %close_err, "error closing device session");
            }
            return Err(e);
        }
    };

    if let Err(close_err) = session.close().await {
        debug!(error = %close_err, "error closing device session");
    }

    match extract_version(platform, &output) {
        Some(version) => {
            debug!(version = %version, "recorded device version");
            let mut table = table.lock().await;
            table.insert(target.address.clone(), version);
            Ok(PollStatus::Recorded)
        }
        None => {
            debug!("no version token in command output");
            Ok(PollStatus::NoData)
        }
    }
}
