// Result of one collection pass: required pools plus optional sources

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Dataset, Pool, ScanStatus, ServiceStatus};
use crate::error::FetchError;

/// Data source a fetch (and its failure) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Pools,
    Datasets,
    #[serde(rename = "scan_status")]
    ScanStatuses,
    Services,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Pools => "pools",
            Source::Datasets => "datasets",
            Source::ScanStatuses => "scan_status",
            Source::Services => "services",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything gathered once the pool fetch succeeded. Each optional source
/// keeps its own outcome; a failure in one never touches the others.
#[derive(Debug)]
pub struct Snapshot {
    pub pools: Vec<Pool>,
    pub datasets: Result<Vec<Dataset>, FetchError>,
    pub scan_statuses: Result<Vec<ScanStatus>, FetchError>,
    pub services: Result<Vec<ServiceStatus>, FetchError>,
}

impl Snapshot {
    /// Failed optional sources, in a fixed order.
    pub fn warnings(&self) -> Vec<&FetchError> {
        [
            self.datasets.as_ref().err(),
            self.scan_statuses.as_ref().err(),
            self.services.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// One scrape. Up/down is decided by the pool fetch alone.
#[derive(Debug)]
pub struct Scrape {
    pub duration: Duration,
    pub outcome: Result<Snapshot, FetchError>,
}

impl Scrape {
    pub fn is_up(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.outcome.as_ref().ok()
    }

    /// JSON-friendly view of this scrape.
    pub fn report(&self) -> ScrapeReport {
        let duration_seconds = self.duration.as_secs_f64();
        match &self.outcome {
            Ok(snapshot) => ScrapeReport {
                up: true,
                duration_seconds,
                error: None,
                pools: Some(snapshot.pools.clone()),
                datasets: snapshot.datasets.as_ref().ok().cloned(),
                scan_statuses: snapshot.scan_statuses.as_ref().ok().cloned(),
                services: snapshot.services.as_ref().ok().cloned(),
                warnings: snapshot
                    .warnings()
                    .into_iter()
                    .map(|e| SourceWarning {
                        source: e.source_kind(),
                        message: e.to_string(),
                    })
                    .collect(),
            },
            Err(e) => ScrapeReport {
                up: false,
                duration_seconds,
                error: Some(e.to_string()),
                pools: None,
                datasets: None,
                scan_statuses: None,
                services: None,
                warnings: vec![],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceWarning {
    pub source: Source,
    pub message: String,
}

/// Serialized form of a [`Scrape`]; a `None` list means the source failed or
/// was not attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub up: bool,
    pub duration_seconds: f64,
    pub error: Option<String>,
    pub pools: Option<Vec<Pool>>,
    pub datasets: Option<Vec<Dataset>>,
    pub scan_statuses: Option<Vec<ScanStatus>>,
    pub services: Option<Vec<ServiceStatus>>,
    pub warnings: Vec<SourceWarning>,
}
