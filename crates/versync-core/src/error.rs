//! Error types for versync-core

use thiserror::Error;

use versync_netbox::NetboxError;

/// Errors that abort an entire reconciliation run
///
/// Everything else (session failures, extraction misses, rejected
/// write-backs) is isolated to its device and recorded in the run report.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Inventory listing failed before any polling started
    #[error("inventory fetch failed: {0}")]
    Fetch(#[from] NetboxError),
}
