//! HTTP client for the NetBox API

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{NetboxError, Result};
use crate::traits::Inventory;
use crate::types::{Device, DeviceList};

/// Page size used when listing devices
const PAGE_LIMIT: u64 = 300;

/// Filter for the device listing
#[derive(Debug, Clone)]
pub struct DeviceFilter {
    /// Device status, e.g. "active"
    pub status: String,
    /// Owning tenant slug, e.g. "noc"
    pub tenant: String,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self {
            status: "active".to_string(),
            tenant: "noc".to_string(),
        }
    }
}

/// HTTP client for communicating with a NetBox instance
#[derive(Debug, Clone)]
pub struct NetboxClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl NetboxClient {
    /// Create a new NetBox client
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>, token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            client: Client::new(),
            base_url,
            token: token.into(),
        })
    }

    /// Create a new NetBox client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(
        base_url: impl AsRef<str>,
        token: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Build a full URL from a path
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(NetboxError::Url)
    }

    /// Fetch one page of the device list
    async fn get_page(&self, url: Url) -> Result<DeviceList> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(NetboxError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Inventory for NetboxClient {
    /// List devices matching the filter, following pagination until
    /// exhausted. Devices without a primary IP are dropped.
    #[instrument(skip(self), fields(status = %filter.status, tenant = %filter.tenant))]
    async fn list_devices(&self, filter: &DeviceFilter) -> Result<Vec<Device>> {
        let mut url = self.url("/api/dcim/devices/")?;
        url.query_pairs_mut()
            .append_pair("status", &filter.status)
            .append_pair("tenant", &filter.tenant)
            .append_pair("limit", &PAGE_LIMIT.to_string())
            .append_pair("offset", "0");

        let mut devices = Vec::new();
        let mut next = Some(url);

        while let Some(page_url) = next {
            debug!(url = %page_url, "fetching device page");
            let page = self.get_page(page_url).await?;

            devices.extend(
                page.results
                    .into_iter()
                    .filter(|d| d.primary_ip.is_some()),
            );

            next = match page.next {
                Some(raw) => Some(Url::parse(&raw)?),
                None => None,
            };
        }

        info!(count = devices.len(), "device listing materialized");

        Ok(devices)
    }

    /// PATCH the `sw_version` custom field of one device
    #[instrument(skip(self, version))]
    async fn update_sw_version(&self, device_id: u64, version: &str) -> Result<()> {
        let url = self.url(&format!("/api/dcim/devices/{device_id}/"))?;
        let payload = json!({"custom_fields": {"sw_version": version}});

        let response = self
            .client
            .patch(url)
            .header("Authorization", format!("Token {}", self.token))
            .json(&payload)
            .send()
            .await?;

        // NetBox answers a successful partial update with 200 exactly
        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(NetboxError::Api { status, message });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NetboxClient::new("http://localhost:8000", "token");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = NetboxClient::new("not a url", "token");
        assert!(client.is_err());
    }

    #[test]
    fn test_url_building() {
        let client = NetboxClient::new("http://localhost:8000", "token").unwrap();
        let url = client.url("/api/dcim/devices/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/dcim/devices/");
    }

    #[test]
    fn test_filter_defaults() {
        let filter = DeviceFilter::default();
        assert_eq!(filter.status, "active");
        assert_eq!(filter.tenant, "noc");
    }
}
