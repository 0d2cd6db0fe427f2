// Pool models

use serde::{Deserialize, Serialize};

/// Health of a pool as reported by `zpool list -o health`.
///
/// Unknown tokens are kept (uppercased) instead of failing the parse, so a
/// newer ZFS release with an extra state still yields a pool record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PoolHealth {
    Online,
    Degraded,
    Faulted,
    Offline,
    Removed,
    Unavailable,
    Other(String),
}

impl PoolHealth {
    /// Every known state, in the order metrics emit them.
    pub const KNOWN: [PoolHealth; 6] = [
        PoolHealth::Online,
        PoolHealth::Degraded,
        PoolHealth::Faulted,
        PoolHealth::Offline,
        PoolHealth::Removed,
        PoolHealth::Unavailable,
    ];

    /// Case-insensitive parse of a health token.
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "ONLINE" => PoolHealth::Online,
            "DEGRADED" => PoolHealth::Degraded,
            "FAULTED" => PoolHealth::Faulted,
            "OFFLINE" => PoolHealth::Offline,
            "REMOVED" => PoolHealth::Removed,
            "UNAVAIL" | "UNAVAILABLE" => PoolHealth::Unavailable,
            _ => PoolHealth::Other(upper),
        }
    }

    /// Canonical uppercase token, as `zpool` prints it.
    pub fn as_str(&self) -> &str {
        match self {
            PoolHealth::Online => "ONLINE",
            PoolHealth::Degraded => "DEGRADED",
            PoolHealth::Faulted => "FAULTED",
            PoolHealth::Offline => "OFFLINE",
            PoolHealth::Removed => "REMOVED",
            PoolHealth::Unavailable => "UNAVAIL",
            PoolHealth::Other(s) => s,
        }
    }

    /// Lowercase label used for the `state` label of the health state-set.
    pub fn state_label(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<PoolHealth> for String {
    fn from(h: PoolHealth) -> Self {
        h.as_str().to_string()
    }
}

impl From<String> for PoolHealth {
    fn from(s: String) -> Self {
        PoolHealth::parse(&s)
    }
}

impl std::fmt::Display for PoolHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `zpool list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub name: String,
    pub size: u64,
    pub allocated: u64,
    pub free: u64,
    /// 0-1 ratio; NaN when the pool does not report fragmentation.
    pub fragmentation: f64,
    pub dedup_ratio: f64,
    pub health: PoolHealth,
    pub read_only: bool,
}
