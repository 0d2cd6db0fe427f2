// Dataset models

use serde::{Deserialize, Serialize};

/// Dataset type from `zfs list -o type`. Anything other than the two kinds
/// we ask for is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DatasetKind {
    Filesystem,
    Volume,
    Other(String),
}

impl DatasetKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "filesystem" => DatasetKind::Filesystem,
            "volume" => DatasetKind::Volume,
            other => DatasetKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DatasetKind::Filesystem => "filesystem",
            DatasetKind::Volume => "volume",
            DatasetKind::Other(s) => s,
        }
    }
}

impl From<DatasetKind> for String {
    fn from(k: DatasetKind) -> Self {
        k.as_str().to_string()
    }
}

impl From<String> for DatasetKind {
    fn from(s: String) -> Self {
        DatasetKind::parse(&s)
    }
}

/// One row of `zfs list` (filesystems and volumes only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub name: String,
    /// Owning pool, derived from `name` ("tank/data" -> "tank").
    pub pool: String,
    pub used: u64,
    pub available: u64,
    pub referenced: u64,
    pub kind: DatasetKind,
    pub share_nfs: bool,
    pub share_smb: bool,
}
