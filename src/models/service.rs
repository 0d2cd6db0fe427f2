// Host service state

use serde::{Deserialize, Serialize};

/// State of a logical host service (e.g. "nfs"), resolved from whichever
/// candidate systemd unit exists on this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    pub active: bool,
}
