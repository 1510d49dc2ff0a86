//! Device record types consumed from the NetBox API

use serde::{Deserialize, Serialize};

/// One page of the device list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceList {
    /// Total record count reported by NetBox
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// Devices on this page
    pub results: Vec<Device>,
}

/// A device record as returned by `/api/dcim/devices/`
///
/// Only the fields the reconciliation consumes are modeled; NetBox sends
/// many more and serde drops them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// NetBox device id
    pub id: u64,
    /// Display name
    pub display: String,
    /// Primary IP assignment, absent for unaddressed devices
    pub primary_ip: Option<PrimaryIp>,
    /// Platform assignment, absent for unclassified devices
    pub platform: Option<PlatformRef>,
    /// Custom field values
    #[serde(default)]
    pub custom_fields: CustomFields,
}

impl Device {
    /// Primary IP with the mask suffix stripped ("10.0.0.1/24" -> "10.0.0.1")
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.primary_ip
            .as_ref()
            .and_then(|ip| ip.address.split('/').next())
    }

    /// Platform slug selecting the extraction rules
    #[must_use]
    pub fn platform_slug(&self) -> Option<&str> {
        self.platform.as_ref().map(|p| p.slug.as_str())
    }

    /// Software version currently recorded in NetBox
    #[must_use]
    pub fn reported_version(&self) -> Option<&str> {
        self.custom_fields.sw_version.as_deref()
    }
}

/// Primary IP assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryIp {
    /// "IP/mask" string, e.g. "192.0.2.1/24"
    pub address: String,
}

/// Platform reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRef {
    /// Platform slug, e.g. "cisco_ios"
    pub slug: String,
}

/// Custom field values on a device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFields {
    /// The reconciled software version field
    pub sw_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_device_page() {
        let json = r#"{
            "count": 2,
            "next": "https://netbox.example.com/api/dcim/devices/?limit=300&offset=300",
            "results": [
                {
                    "id": 17,
                    "display": "core-sw-01",
                    "primary_ip": {"address": "192.0.2.1/24"},
                    "platform": {"slug": "cisco_ios"},
                    "custom_fields": {"sw_version": "15.2(4)M6"}
                },
                {
                    "id": 18,
                    "display": "unracked-spare",
                    "primary_ip": null,
                    "platform": null,
                    "custom_fields": {"sw_version": null}
                }
            ]
        }"#;

        let page: DeviceList = serde_json::from_str(json).unwrap();

        assert_eq!(page.count, 2);
        assert!(page.next.is_some());
        assert_eq!(page.results.len(), 2);

        let device = &page.results[0];
        assert_eq!(device.address(), Some("192.0.2.1"));
        assert_eq!(device.platform_slug(), Some("cisco_ios"));
        assert_eq!(device.reported_version(), Some("15.2(4)M6"));

        let spare = &page.results[1];
        assert_eq!(spare.address(), None);
        assert_eq!(spare.platform_slug(), None);
        assert_eq!(spare.reported_version(), None);
    }

    #[test]
    fn test_missing_custom_fields_default() {
        let json = r#"{"id": 1, "display": "fw-01", "primary_ip": {"address": "10.0.0.1/32"}, "platform": {"slug": "paloalto_panos"}}"#;

        let device: Device = serde_json::from_str(json).unwrap();

        assert_eq!(device.reported_version(), None);
        assert_eq!(device.address(), Some("10.0.0.1"));
    }
}
