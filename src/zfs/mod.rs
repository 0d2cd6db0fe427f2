// ZFS CLI client: runs zpool/zfs through a CommandRunner and parses the output

mod dataset;
mod pool;
mod scan;

pub use dataset::{
    DATASET_COLUMNS, DATASET_TYPES, extract_pool_name, is_share_enabled, parse_datasets,
};
pub use pool::{POOL_COLUMNS, parse_pools};
pub use scan::{ScanParser, SectionState, parse_scan_statuses};

use crate::error::FetchError;
use crate::models::{Dataset, Pool, ScanStatus};
use crate::runner::CommandRunner;
use std::sync::Arc;
use tracing::instrument;

pub struct ZfsClient {
    runner: Arc<dyn CommandRunner>,
    zpool_path: String,
    zfs_path: String,
}

impl ZfsClient {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        zpool_path: impl Into<String>,
        zfs_path: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            zpool_path: zpool_path.into(),
            zfs_path: zfs_path.into(),
        }
    }

    /// All pools (`zpool list`).
    #[instrument(skip(self), fields(source = "pools", operation = "get_pools"))]
    pub async fn get_pools(&self) -> Result<Vec<Pool>, FetchError> {
        let out = self
            .runner
            .run(&self.zpool_path, &["list", "-Hp", "-o", POOL_COLUMNS])
            .await
            .map_err(FetchError::PoolCommand)?;
        let pools = parse_pools(&out).map_err(FetchError::PoolParse)?;
        tracing::debug!(pools_count = pools.len(), "pools fetched");
        Ok(pools)
    }

    /// Filesystems and volumes (`zfs list`).
    #[instrument(skip(self), fields(source = "datasets", operation = "get_datasets"))]
    pub async fn get_datasets(&self) -> Result<Vec<Dataset>, FetchError> {
        let out = self
            .runner
            .run(
                &self.zfs_path,
                &["list", "-Hp", "-o", DATASET_COLUMNS, "-t", DATASET_TYPES],
            )
            .await
            .map_err(FetchError::DatasetCommand)?;
        let datasets = parse_datasets(&out).map_err(FetchError::DatasetParse)?;
        tracing::debug!(datasets_count = datasets.len(), "datasets fetched");
        Ok(datasets)
    }

    /// Scrub/resilver state per pool (`zpool status`).
    #[instrument(skip(self), fields(source = "scan_status", operation = "get_scan_statuses"))]
    pub async fn get_scan_statuses(&self) -> Result<Vec<ScanStatus>, FetchError> {
        let out = self
            .runner
            .run(&self.zpool_path, &["status"])
            .await
            .map_err(FetchError::ScanCommand)?;
        Ok(parse_scan_statuses(&out))
    }
}
