// Scrub / resilver state per pool

use serde::{Deserialize, Serialize};

/// Scan state of one pool. At most one of `scrub` / `resilver` is set;
/// both false with progress 0 means no scan is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    pub pool: String,
    pub scrub: bool,
    pub resilver: bool,
    pub progress: f64,
}

impl ScanStatus {
    /// Record for a pool with no active scan.
    pub fn idle(pool: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            scrub: false,
            resilver: false,
            progress: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.scrub || self.resilver
    }
}
