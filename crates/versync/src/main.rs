//! versync CLI
//!
//! Reconciles the `sw_version` custom field in NetBox against the version
//! running on each device

use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use versync_core::{Credentials, DeviceOutcome, ReconciliationDriver, SyncConfig};
use versync_exec::SshSessionFactory;
use versync_netbox::NetboxClient;

#[derive(Parser)]
#[command(name = "versync")]
#[command(about = "Sync running device software versions into NetBox", long_about = None)]
struct Cli {
    /// Base URL of the NetBox instance
    #[arg(long)]
    netbox_url: String,

    /// NetBox API token
    #[arg(long)]
    netbox_token: String,

    /// Username for device logins
    #[arg(long)]
    device_username: String,

    /// Password for device logins
    #[arg(long)]
    device_password: String,

    /// Tenant slug to reconcile
    #[arg(long, default_value = "noc")]
    tenant: String,

    /// Device status filter
    #[arg(long, default_value = "active")]
    status: String,

    /// Maximum concurrent device sessions
    #[arg(long, default_value_t = 10)]
    max_in_flight: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(netbox = %cli.netbox_url, tenant = %cli.tenant, "starting reconciliation");

    let config = SyncConfig {
        status: cli.status,
        tenant: cli.tenant,
        max_in_flight: cli.max_in_flight,
        ..SyncConfig::default()
    };

    let inventory = Arc::new(NetboxClient::new(&cli.netbox_url, cli.netbox_token)?);
    let factory = Arc::new(SshSessionFactory::new());
    let credentials = Credentials::new(cli.device_username, cli.device_password);

    let driver = ReconciliationDriver::new(inventory, factory, config, credentials);

    // A failed inventory fetch is the only fatal path; it surfaces here
    // and exits non-zero
    let report = driver.run().await?;

    for entry in &report.outcomes {
        match &entry.outcome {
            DeviceOutcome::Updated { from, to } => {
                println!(
                    "{}: updated {} -> {to}",
                    entry.display,
                    from.as_deref().unwrap_or("<unset>")
                );
            }
            DeviceOutcome::UpToDate { version } => {
                println!("{}: up to date ({version})", entry.display);
            }
            DeviceOutcome::WriteFailed { target, detail } => {
                println!("{}: write of {target} failed: {detail}", entry.display);
            }
            DeviceOutcome::SkippedUnsupportedPlatform => {
                println!("{}: skipped (unsupported platform)", entry.display);
            }
            DeviceOutcome::SkippedPollFailed => {
                println!("{}: skipped (poll failed)", entry.display);
            }
            DeviceOutcome::SkippedNoData => {
                println!("{}: skipped (no version found)", entry.display);
            }
        }
    }

    println!(
        "{} updated, {} up to date, {} skipped, {} write failures",
        report.updated(),
        report.up_to_date(),
        report.skipped(),
        report.write_failed()
    );

    Ok(())
}
