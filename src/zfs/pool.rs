// Parse `zpool list -Hp -o name,size,alloc,free,frag,dedup,health,readonly`

use crate::error::ParseError;
use crate::models::{Pool, PoolHealth};

/// Column selection passed to `zpool list -o`.
pub const POOL_COLUMNS: &str = "name,size,alloc,free,frag,dedup,health,readonly";

const POOL_FIELDS: usize = 8;

/// Parses tab-separated pool rows. Empty output means "no pools". A single
/// malformed row fails the whole call, so a partial pool list is never reported.
pub fn parse_pools(data: &[u8]) -> Result<Vec<Pool>, ParseError> {
    let text = String::from_utf8_lossy(data);
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != POOL_FIELDS {
                return Err(ParseError::FieldCount {
                    expected: POOL_FIELDS,
                    got: fields.len(),
                    line: line.to_string(),
                });
            }
            parse_pool_fields(&fields)
        })
        .collect()
}

fn parse_pool_fields(f: &[&str]) -> Result<Pool, ParseError> {
    let name = f[0];
    let invalid = |field: &'static str, value: &str, reason: String| ParseError::InvalidField {
        name: name.to_string(),
        field,
        value: value.to_string(),
        reason,
    };

    let size: u64 = f[1].parse().map_err(|e| invalid("size", f[1], format!("{e}")))?;
    let allocated: u64 = f[2]
        .parse()
        .map_err(|e| invalid("allocated", f[2], format!("{e}")))?;
    let free: u64 = f[3].parse().map_err(|e| invalid("free", f[3], format!("{e}")))?;

    let fragmentation = if f[4] == "-" {
        f64::NAN
    } else {
        let pct: u64 = f[4]
            .parse()
            .map_err(|e| invalid("fragmentation", f[4], format!("{e}")))?;
        pct as f64 / 100.0
    };

    let dedup_ratio: f64 = f[5]
        .parse()
        .map_err(|e| invalid("dedup ratio", f[5], format!("{e}")))?;

    Ok(Pool {
        name: name.to_string(),
        size,
        allocated,
        free,
        fragmentation,
        dedup_ratio,
        health: PoolHealth::parse(f[6]),
        read_only: f[7] == "on",
    })
}
