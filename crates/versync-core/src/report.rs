//! Run report types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to one device during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeviceOutcome {
    /// NetBox record was updated to the polled version
    Updated {
        /// Version previously recorded in NetBox
        from: Option<String>,
        /// Polled version written back
        to: String,
    },
    /// Polled version matched the NetBox record
    UpToDate {
        /// The matching version
        version: String,
    },
    /// NetBox rejected the write-back
    WriteFailed {
        /// Version we tried to write
        target: String,
        /// Error detail from the service
        detail: String,
    },
    /// No extraction rule exists for the device's platform
    SkippedUnsupportedPlatform,
    /// The session failed before a version could be read
    SkippedPollFailed,
    /// The session succeeded but no version token was found
    SkippedNoData,
}

/// Per-device entry in the run report
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    /// NetBox device id
    pub device_id: u64,
    /// Display name
    pub display: String,
    /// Polled address
    pub address: String,
    /// Outcome for this device
    pub outcome: DeviceOutcome,
}

/// Summary of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Per-device outcomes
    pub outcomes: Vec<DeviceReport>,
}

impl RunReport {
    /// Count of devices updated in NetBox
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::Updated { .. }))
    }

    /// Count of devices already current
    #[must_use]
    pub fn up_to_date(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::UpToDate { .. }))
    }

    /// Count of rejected write-backs
    #[must_use]
    pub fn write_failed(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::WriteFailed { .. }))
    }

    /// Count of devices skipped for any reason
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                DeviceOutcome::SkippedUnsupportedPlatform
                    | DeviceOutcome::SkippedPollFailed
                    | DeviceOutcome::SkippedNoData
            )
        })
    }

    fn count(&self, pred: impl Fn(&DeviceOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|r| pred(&r.outcome)).count()
    }
}
