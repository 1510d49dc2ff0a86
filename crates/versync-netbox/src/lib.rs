//! versync-netbox: NetBox inventory API client
//!
//! Paginated device listing and single-field write-back against the NetBox
//! DCIM API

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{DeviceFilter, NetboxClient};
pub use error::{NetboxError, Result};
pub use traits::Inventory;
pub use types::{CustomFields, Device, DeviceList, PlatformRef, PrimaryIp};
