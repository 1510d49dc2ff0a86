//! versync-core: Device polling and version reconciliation engine
//!
//! Fans out bounded concurrent device polls, extracts version strings with
//! platform-specific rules, and diffs the results against NetBox records.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod platform;
pub mod poller;
pub mod reconcile;
pub mod report;

pub use config::{Credentials, SyncConfig};
pub use coordinator::{PollSummary, poll_all};
pub use error::ReconcileError;
pub use extract::{ExtractOutcome, extract, extract_version};
pub use platform::Platform;
pub use poller::{PollStatus, PollTarget, poll_device};
pub use reconcile::{ReconciliationAction, ReconciliationDriver, diff};
pub use report::{DeviceOutcome, DeviceReport, RunReport};
