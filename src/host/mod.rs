// Host service checks via systemctl.
//
// A logical service key (e.g. "nfs") maps to an ordered list of candidate
// units because distributions name them differently. The first unit that
// exists decides the key's state; a key with no existing unit is omitted.

use crate::models::ServiceStatus;
use crate::runner::CommandRunner;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::{Instant, timeout_at};
use tracing::instrument;

/// Keys monitored when the configuration does not name any.
pub const DEFAULT_SERVICE_KEYS: [&str; 4] = ["zfs", "nfs", "smb", "iscsi"];

/// Built-in candidate units per service key, tried in order.
pub fn default_service_units() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 4] = [
        ("zfs", &["zfs-zed.service"]),
        ("nfs", &["nfs-kernel-server.service", "nfs-server.service"]),
        ("smb", &["smbd.service", "smb.service"]),
        (
            "iscsi",
            &[
                "iscsid.socket",
                "iscsid.service",
                "iscsi.service",
                "tgt.service",
                "iscsitarget.service",
            ],
        ),
    ];
    table
        .into_iter()
        .map(|(key, units)| {
            (
                key.to_string(),
                units.iter().map(|u| u.to_string()).collect(),
            )
        })
        .collect()
}

/// Resolves configured keys to candidate units. `overrides` replace or add
/// entries of the built-in table; keys found in neither are dropped.
pub fn build_service_map(
    keys: &[String],
    overrides: &BTreeMap<String, Vec<String>>,
) -> BTreeMap<String, Vec<String>> {
    let defaults = default_service_units();
    let mut services = BTreeMap::new();
    for key in keys {
        match overrides.get(key).or_else(|| defaults.get(key)) {
            Some(units) if !units.is_empty() => {
                services.insert(key.clone(), units.clone());
            }
            _ => {
                tracing::warn!(service = %key, "no candidate units known for service key, ignoring");
            }
        }
    }
    services
}

pub struct ServiceChecker {
    runner: Arc<dyn CommandRunner>,
    systemctl_path: String,
}

impl ServiceChecker {
    pub fn new(runner: Arc<dyn CommandRunner>, systemctl_path: impl Into<String>) -> Self {
        Self {
            runner,
            systemctl_path: systemctl_path.into(),
        }
    }

    /// One record per key that has an existing unit, ordered by key.
    /// Probe failures degrade to "skipped" or "inactive", never to an error.
    /// Each systemctl call is bounded by `deadline`: a probe still running
    /// then counts as a failed probe, so keys resolved earlier are kept.
    #[instrument(skip_all, fields(source = "services", operation = "check_services"))]
    pub async fn check_services(
        &self,
        services: &BTreeMap<String, Vec<String>>,
        deadline: Instant,
    ) -> Vec<ServiceStatus> {
        let mut statuses = Vec::with_capacity(services.len());
        for (key, units) in services {
            if let Some(status) = self.check_service_units(key, units, deadline).await {
                statuses.push(status);
            }
        }
        statuses
    }

    async fn check_service_units(
        &self,
        key: &str,
        units: &[String],
        deadline: Instant,
    ) -> Option<ServiceStatus> {
        for unit in units {
            if !self.unit_exists(unit, deadline).await {
                tracing::debug!(service = key, unit = %unit, "unit not found, trying next");
                continue;
            }

            let active = self.is_active(key, unit, deadline).await;
            return Some(ServiceStatus {
                name: key.to_string(),
                active,
            });
        }

        tracing::debug!(service = key, "no unit found for service key, skipping");
        None
    }

    /// `systemctl show --property=LoadState` reports `not-found` for missing
    /// units whatever their activity. `is-active` cannot be used for this:
    /// it prints `inactive` for both missing and stopped units.
    async fn unit_exists(&self, unit: &str, deadline: Instant) -> bool {
        let args = ["show", "--property=LoadState", unit];
        let probe = self.runner.run(&self.systemctl_path, &args);
        match timeout_at(deadline, probe).await {
            Ok(Ok(out)) => !String::from_utf8_lossy(&out).contains("not-found"),
            Ok(Err(e)) => {
                tracing::debug!(unit, error = %e, "systemctl show failed");
                false
            }
            Err(_) => {
                tracing::debug!(unit, "systemctl show hit the scrape deadline");
                false
            }
        }
    }

    /// `is-active` exits non-zero for anything but `active`, so a failing exit
    /// that still printed a state token is a normal answer.
    async fn is_active(&self, key: &str, unit: &str, deadline: Instant) -> bool {
        let args = ["is-active", unit];
        let probe = self.runner.run(&self.systemctl_path, &args);
        let Ok(result) = timeout_at(deadline, probe).await else {
            tracing::debug!(
                service = key,
                unit,
                "is-active hit the scrape deadline, reporting inactive"
            );
            return false;
        };
        let out = match &result {
            Ok(out) => out.as_slice(),
            Err(e) => e.stdout(),
        };
        let state = String::from_utf8_lossy(out);
        let state = state.trim();

        if let Err(e) = &result
            && state.is_empty()
        {
            tracing::debug!(
                service = key,
                unit,
                error = %e,
                "is-active failed with no output, reporting inactive"
            );
            return false;
        }
        state == "active"
    }
}
