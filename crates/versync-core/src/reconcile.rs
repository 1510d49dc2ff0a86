//! End-to-end reconciliation driver

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use versync_exec::SessionFactory;
use versync_netbox::{Device, DeviceFilter, Inventory};

use crate::config::{Credentials, SyncConfig};
use crate::coordinator::{PollSummary, poll_all};
use crate::error::ReconcileError;
use crate::poller::{PollStatus, PollTarget};
use crate::report::{DeviceOutcome, DeviceReport, RunReport};

/// Decision record for one device with a polled version
#[derive(Debug, Clone)]
pub struct ReconciliationAction {
    /// NetBox device id
    pub device_id: u64,
    /// Display name
    pub display: String,
    /// Polled address
    pub address: String,
    /// Version currently recorded in NetBox
    pub reported: Option<String>,
    /// Version read from the device
    pub polled: String,
    /// True when the NetBox record must be corrected
    pub needs_update: bool,
}

/// Diff the inventory list against the polled versions
///
/// Devices with a polled entry become a [`ReconciliationAction`]; devices
/// absent from the table are a skip, reported with the reason the poll
/// recorded. Absence is a control-flow branch here, never a panic: a
/// skipped or failed device must not stop the loop for its siblings.
#[must_use]
pub fn diff(
    devices: &[Device],
    summary: &PollSummary,
) -> (Vec<ReconciliationAction>, Vec<DeviceReport>) {
    let mut actions = Vec::new();
    let mut skips = Vec::new();

    for device in devices {
        let Some(address) = device.address() else {
            continue;
        };

        match summary.versions.get(address) {
            Some(polled) => {
                let reported = device.reported_version();
                let needs_update = reported != Some(polled.as_str());

                actions.push(ReconciliationAction {
                    device_id: device.id,
                    display: device.display.clone(),
                    address: address.to_string(),
                    reported: reported.map(str::to_string),
                    polled: polled.clone(),
                    needs_update,
                });
            }
            None => {
                let outcome = match summary.statuses.get(address) {
                    Some(PollStatus::Unsupported) => {
                        info!(
                            device = %device.display,
                            host = %address,
                            "skipped: unsupported platform"
                        );
                        DeviceOutcome::SkippedUnsupportedPlatform
                    }
                    Some(PollStatus::NoData) => {
                        warn!(
                            device = %device.display,
                            host = %address,
                            "skipped: no version found in command output"
                        );
                        DeviceOutcome::SkippedNoData
                    }
                    _ => {
                        warn!(
                            device = %device.display,
                            host = %address,
                            "skipped: device poll failed"
                        );
                        DeviceOutcome::SkippedPollFailed
                    }
                };

                skips.push(DeviceReport {
                    device_id: device.id,
                    display: device.display.clone(),
                    address: address.to_string(),
                    outcome,
                });
            }
        }
    }

    (actions, skips)
}

/// Orchestrates one reconciliation run: fetch, poll, diff, write back
pub struct ReconciliationDriver {
    inventory: Arc<dyn Inventory>,
    factory: Arc<dyn SessionFactory>,
    config: SyncConfig,
    credentials: Credentials,
}

impl ReconciliationDriver {
    /// Create a driver over an inventory service and a session factory
    pub fn new(
        inventory: Arc<dyn Inventory>,
        factory: Arc<dyn SessionFactory>,
        config: SyncConfig,
        credentials: Credentials,
    ) -> Self {
        Self {
            inventory,
            factory,
            config,
            credentials,
        }
    }

    /// Run the full reconciliation pass
    ///
    /// # Errors
    /// Only a failed inventory listing is fatal. Device failures and
    /// rejected write-backs are recorded per device in the returned report.
    #[instrument(skip(self), fields(status = %self.config.status, tenant = %self.config.tenant))]
    pub async fn run(&self) -> Result<RunReport, ReconcileError> {
        let started_at = Utc::now();

        let filter = DeviceFilter {
            status: self.config.status.clone(),
            tenant: self.config.tenant.clone(),
        };
        let devices = self.inventory.list_devices(&filter).await?;
        info!(count = devices.len(), "fetched eligible devices");

        let targets: Vec<PollTarget> = devices.iter().filter_map(PollTarget::from_device).collect();
        let summary = poll_all(
            targets,
            self.factory.clone(),
            self.credentials.clone(),
            self.config.clone(),
        )
        .await;

        let (actions, skips) = diff(&devices, &summary);

        let mut outcomes = skips;
        for action in actions {
            let outcome = self.apply(&action).await;
            outcomes.push(DeviceReport {
                device_id: action.device_id,
                display: action.display,
                address: action.address,
                outcome,
            });
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        info!(
            updated = report.updated(),
            up_to_date = report.up_to_date(),
            skipped = report.skipped(),
            write_failed = report.write_failed(),
            "reconciliation completed"
        );

        Ok(report)
    }

    /// Execute the write-back step for one action
    async fn apply(&self, action: &ReconciliationAction) -> DeviceOutcome {
        if !action.needs_update {
            info!(
                device = %action.display,
                version = %action.polled,
                "version up to date"
            );
            return DeviceOutcome::UpToDate {
                version: action.polled.clone(),
            };
        }

        info!(
            device = %action.display,
            reported = action.reported.as_deref().unwrap_or("<unset>"),
            polled = %action.polled,
            "correcting device version"
        );

        match self
            .inventory
            .update_sw_version(action.device_id, &action.polled)
            .await
        {
            Ok(()) => {
                info!(device = %action.display, "successfully updated device");
                DeviceOutcome::Updated {
                    from: action.reported.clone(),
                    to: action.polled.clone(),
                }
            }
            Err(e) => {
                error!(device = %action.display, error = %e, "failed to update device");
                DeviceOutcome::WriteFailed {
                    target: action.polled.clone(),
                    detail: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use versync_netbox::{CustomFields, PlatformRef, PrimaryIp};

    fn device(id: u64, address: &str, slug: &str, sw_version: Option<&str>) -> Device {
        Device {
            id,
            display: format!("dev-{id}"),
            primary_ip: Some(PrimaryIp {
                address: format!("{address}/24"),
            }),
            platform: Some(PlatformRef {
                slug: slug.to_string(),
            }),
            custom_fields: CustomFields {
                sw_version: sw_version.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_diff_matching_version_is_noop() {
        let devices = vec![device(1, "192.0.2.1", "cisco_ios", Some("15.2(4)E10"))];
        let mut summary = PollSummary::default();
        summary
            .versions
            .insert("192.0.2.1".to_string(), "15.2(4)E10".to_string());
        summary
            .statuses
            .insert("192.0.2.1".to_string(), PollStatus::Recorded);

        let (actions, skips) = diff(&devices, &summary);

        assert_eq!(actions.len(), 1);
        assert!(!actions[0].needs_update);
        assert!(skips.is_empty());
    }

    #[test]
    fn test_diff_mismatch_needs_update() {
        let devices = vec![device(1, "192.0.2.1", "cisco_ios", Some("1.0"))];
        let mut summary = PollSummary::default();
        summary
            .versions
            .insert("192.0.2.1".to_string(), "2.1".to_string());

        let (actions, _) = diff(&devices, &summary);

        assert!(actions[0].needs_update);
        assert_eq!(actions[0].polled, "2.1");
        assert_eq!(actions[0].reported.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_diff_empty_reported_field_needs_update() {
        let devices = vec![device(1, "192.0.2.1", "cisco_ios", None)];
        let mut summary = PollSummary::default();
        summary
            .versions
            .insert("192.0.2.1".to_string(), "2.1".to_string());

        let (actions, _) = diff(&devices, &summary);

        assert!(actions[0].needs_update);
        assert_eq!(actions[0].reported, None);
    }

    #[test]
    fn test_diff_missing_entry_is_skip_not_panic() {
        let devices = vec![
            device(1, "192.0.2.1", "cisco_ios", Some("1.0")),
            device(2, "192.0.2.2", "juniper_junos", Some("2.0")),
            device(3, "192.0.2.3", "cisco_asa", Some("3.0")),
        ];
        let mut summary = PollSummary::default();
        summary
            .versions
            .insert("192.0.2.1".to_string(), "1.0".to_string());
        summary
            .statuses
            .insert("192.0.2.1".to_string(), PollStatus::Recorded);
        summary
            .statuses
            .insert("192.0.2.2".to_string(), PollStatus::Unsupported);
        summary
            .statuses
            .insert("192.0.2.3".to_string(), PollStatus::Failed);

        let (actions, skips) = diff(&devices, &summary);

        assert_eq!(actions.len(), 1);
        assert_eq!(skips.len(), 2);
        assert_eq!(skips[0].outcome, DeviceOutcome::SkippedUnsupportedPlatform);
        assert_eq!(skips[1].outcome, DeviceOutcome::SkippedPollFailed);
    }
}
