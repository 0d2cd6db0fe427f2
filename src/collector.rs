// Scrape orchestration: required pool fetch, then the optional sources
// concurrently, all inside one deadline.

use crate::error::FetchError;
use crate::host::ServiceChecker;
use crate::models::{Scrape, Snapshot, Source};
use crate::zfs::ZfsClient;
use std::collections::BTreeMap;
use std::future::Future;
use tokio::time::{Duration, Instant, timeout_at};

pub struct Collector {
    client: ZfsClient,
    service_checker: ServiceChecker,
    services: BTreeMap<String, Vec<String>>,
    timeout: Duration,
}

impl Collector {
    /// `timeout` is the budget for a whole scrape, not per command.
    pub fn new(
        client: ZfsClient,
        service_checker: ServiceChecker,
        services: BTreeMap<String, Vec<String>>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            service_checker,
            services,
            timeout,
        }
    }

    /// Runs one scrape. Pools are required: if they fail nothing else is
    /// attempted and the scrape is down. Datasets, scan statuses and services
    /// run concurrently; each failure stays in its own slot. Services degrade
    /// per key at the deadline instead of failing as a whole.
    pub async fn collect(&self) -> Scrape {
        let start = Instant::now();
        let deadline = start + self.timeout;

        let pools = match bounded(deadline, Source::Pools, self.client.get_pools()).await {
            Ok(pools) => pools,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    source = %e.source_kind(),
                    operation = "get_pools",
                    "Failed to get pools"
                );
                return Scrape {
                    duration: start.elapsed(),
                    outcome: Err(e),
                };
            }
        };

        let (datasets, scan_statuses, services) = tokio::join!(
            bounded(deadline, Source::Datasets, self.client.get_datasets()),
            bounded(
                deadline,
                Source::ScanStatuses,
                self.client.get_scan_statuses()
            ),
            async {
                let services = self
                    .service_checker
                    .check_services(&self.services, deadline)
                    .await;
                Ok::<_, FetchError>(services)
            },
        );

        let snapshot = Snapshot {
            pools,
            datasets,
            scan_statuses,
            services,
        };
        for e in snapshot.warnings() {
            tracing::warn!(
                error = %e,
                source = %e.source_kind(),
                "optional source failed, its metrics are omitted"
            );
        }

        let duration = start.elapsed();
        tracing::debug!(
            operation = "collect",
            duration_ms = duration.as_millis() as u64,
            pools_count = snapshot.pools.len(),
            warnings = snapshot.warnings().len(),
            "scrape complete"
        );
        Scrape {
            duration,
            outcome: Ok(snapshot),
        }
    }
}

/// Runs `fetch` until `deadline`; the future is dropped (and its command
/// killed) if the deadline passes first.
async fn bounded<T, F>(deadline: Instant, source: Source, fetch: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match timeout_at(deadline, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::DeadlineExceeded(source)),
    }
}
