//! Bounded concurrent fan-out over the device set

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use versync_exec::SessionFactory;

use crate::config::{Credentials, SyncConfig};
use crate::poller::{PollStatus, PollTarget, poll_device};

/// Aggregated result of polling the full device set
#[derive(Debug, Default)]
pub struct PollSummary {
    /// address -> extracted version, for every device that yielded one
    pub versions: HashMap<String, String>,
    /// address -> how that device's poll ended
    pub statuses: HashMap<String, PollStatus>,
}

/// Poll every target with at most `config.max_in_flight` sessions open at
/// once and return the completed table
///
/// One device failing never aborts the others; failed devices are simply
/// absent from `versions`. Returns only after every scheduled poll has
/// finished, so callers can diff without racing in-flight writes.
#[instrument(skip_all, fields(devices = targets.len(), max_in_flight = config.max_in_flight))]
pub async fn poll_all(
    targets: Vec<PollTarget>,
    factory: Arc<dyn SessionFactory>,
    credentials: Credentials,
    config: SyncConfig,
) -> PollSummary {
    let table = Arc::new(Mutex::new(HashMap::new()));
    let semaphore = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
    let credentials = Arc::new(credentials);
    let config = Arc::new(config);

    let mut tasks = JoinSet::new();

    for target in targets {
        let semaphore = semaphore.clone();
        let factory = factory.clone();
        let credentials = credentials.clone();
        let config = config.clone();
        let table = table.clone();

        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                // Semaphore is never closed while tasks are running
                return (target.address, PollStatus::Failed);
            };

            let status =
                match poll_device(factory.as_ref(), &credentials, &config, &target, &table).await {
                    Ok(status) => status,
                    Err(_) => PollStatus::Failed,
                };

            (target.address, status)
        });
    }

    let mut statuses = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((address, status)) => {
                statuses.insert(address, status);
            }
            Err(e) => {
                error!(error = %e, "poll task aborted");
            }
        }
    }

    // Every task has joined; this Arc is the last reference
    let versions = match Arc::try_unwrap(table) {
        Ok(table) => table.into_inner(),
        Err(table) => table.lock().await.clone(),
    };

    info!(
        polled = versions.len(),
        total = statuses.len(),
        "device polling completed"
    );

    PollSummary { versions, statuses }
}
