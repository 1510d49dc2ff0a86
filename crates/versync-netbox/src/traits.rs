//! Inventory service trait

use async_trait::async_trait;

use crate::client::DeviceFilter;
use crate::error::Result;
use crate::types::Device;

/// Inventory service boundary consumed by the reconciliation engine
///
/// Production uses [`crate::NetboxClient`]; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// List eligible devices, fully materialized across all pages
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>>;

    /// Write the software version field of a single device
    async fn update_sw_version(&self, device_id: u64, version: &str) -> Result<()>;
}
