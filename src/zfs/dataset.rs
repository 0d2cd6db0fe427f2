// Parse `zfs list -Hp -o name,used,avail,refer,type,sharenfs,sharesmb -t filesystem,volume`

use crate::error::ParseError;
use crate::models::{Dataset, DatasetKind};

/// Column selection passed to `zfs list -o`.
pub const DATASET_COLUMNS: &str = "name,used,avail,refer,type,sharenfs,sharesmb";

/// Dataset types requested with `zfs list -t` (snapshots and bookmarks excluded).
pub const DATASET_TYPES: &str = "filesystem,volume";

const DATASET_FIELDS: usize = 7;

pub fn parse_datasets(data: &[u8]) -> Result<Vec<Dataset>, ParseError> {
    let text = String::from_utf8_lossy(data);
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != DATASET_FIELDS {
                return Err(ParseError::FieldCount {
                    expected: DATASET_FIELDS,
                    got: fields.len(),
                    line: line.to_string(),
                });
            }
            parse_dataset_fields(&fields)
        })
        .collect()
}

fn parse_dataset_fields(f: &[&str]) -> Result<Dataset, ParseError> {
    let name = f[0];
    let bytes = |field: &'static str, value: &str| {
        value.parse::<u64>().map_err(|e| ParseError::InvalidField {
            name: name.to_string(),
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
    };

    Ok(Dataset {
        name: name.to_string(),
        pool: extract_pool_name(name).to_string(),
        used: bytes("used", f[1])?,
        available: bytes("available", f[2])?,
        referenced: bytes("referenced", f[3])?,
        kind: DatasetKind::parse(f[4]),
        share_nfs: is_share_enabled(f[5]),
        share_smb: is_share_enabled(f[6]),
    })
}

/// Pool that owns a dataset: "tank/data/photos" -> "tank", "tank" -> "tank".
pub fn extract_pool_name(name: &str) -> &str {
    name.split_once('/').map_or(name, |(pool, _)| pool)
}

/// `off` and `-` (volumes) mean not shared; any other value is a share spec.
pub fn is_share_enabled(value: &str) -> bool {
    value != "off" && value != "-"
}
