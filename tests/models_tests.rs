// Record helpers and the JSON scrape report

use std::time::Duration;
use zfs_exporter::error::{CommandError, FetchError};
use zfs_exporter::models::*;

fn pool(name: &str) -> Pool {
    Pool {
        name: name.into(),
        size: 100,
        allocated: 50,
        free: 50,
        fragmentation: f64::NAN,
        dedup_ratio: 1.0,
        health: PoolHealth::Online,
        read_only: false,
    }
}

#[test]
fn pool_health_parse_and_labels() {
    assert_eq!(PoolHealth::parse("online"), PoolHealth::Online);
    assert_eq!(PoolHealth::parse("Faulted"), PoolHealth::Faulted);
    assert_eq!(PoolHealth::parse("UNAVAIL"), PoolHealth::Unavailable);
    assert_eq!(PoolHealth::Unavailable.as_str(), "UNAVAIL");
    assert_eq!(PoolHealth::Unavailable.state_label(), "unavail");
    assert_eq!(
        PoolHealth::parse("suspended"),
        PoolHealth::Other("SUSPENDED".into())
    );
    assert_eq!(PoolHealth::KNOWN.len(), 6);
}

#[test]
fn pool_serializes_camel_case_with_health_token() {
    let json = serde_json::to_value(pool("tank")).unwrap();
    assert_eq!(json["name"], "tank");
    assert_eq!(json["health"], "ONLINE");
    assert_eq!(json["dedupRatio"], 1.0);
    assert_eq!(json["readOnly"], false);
    assert!(json["fragmentation"].is_null(), "NaN serializes as null");
}

#[test]
fn dataset_kind_round_trips_through_json() {
    let kinds = [
        DatasetKind::Filesystem,
        DatasetKind::Volume,
        DatasetKind::Other("snapshot".into()),
    ];
    for kind in kinds {
        let json = serde_json::to_string(&kind).unwrap();
        let back: DatasetKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
    assert_eq!(
        serde_json::to_string(&DatasetKind::Volume).unwrap(),
        "\"volume\""
    );
}

#[test]
fn scan_status_idle() {
    let s = ScanStatus::idle("tank");
    assert_eq!(s.pool, "tank");
    assert!(!s.scrub && !s.resilver);
    assert_eq!(s.progress, 0.0);
    assert!(!s.is_active());
}

#[test]
fn source_names() {
    assert_eq!(Source::Pools.as_str(), "pools");
    assert_eq!(Source::Datasets.as_str(), "datasets");
    assert_eq!(Source::ScanStatuses.as_str(), "scan_status");
    assert_eq!(Source::Services.as_str(), "services");
    assert_eq!(
        serde_json::to_string(&Source::ScanStatuses).unwrap(),
        "\"scan_status\""
    );
}

#[test]
fn report_of_degraded_scrape_lists_warnings() {
    let scrape = Scrape {
        duration: Duration::from_millis(1500),
        outcome: Ok(Snapshot {
            pools: vec![pool("tank")],
            datasets: Err(FetchError::DeadlineExceeded(Source::Datasets)),
            scan_statuses: Err(FetchError::ScanCommand(CommandError::Exit {
                program: "zpool".into(),
                code: Some(1),
                stdout: vec![],
                stderr: "boom".into(),
            })),
            services: Ok(vec![]),
        }),
    };

    let report = scrape.report();
    assert!(report.up);
    assert_eq!(report.duration_seconds, 1.5);
    assert!(report.error.is_none());
    assert_eq!(report.pools.as_ref().unwrap().len(), 1);
    assert!(report.datasets.is_none());
    assert!(report.scan_statuses.is_none());
    assert_eq!(report.services.as_ref().unwrap().len(), 0);

    let sources: Vec<Source> = report.warnings.iter().map(|w| w.source).collect();
    assert_eq!(sources, vec![Source::Datasets, Source::ScanStatuses]);
    assert!(report.warnings[0].message.contains("deadline"));
    assert!(report.warnings[1].message.contains("zpool status failed"));
    assert!(report.warnings[1].message.contains("boom"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["up"], true);
    assert_eq!(json["warnings"][1]["source"], "scan_status");
    assert!(json["scanStatuses"].is_null());
}

#[test]
fn report_of_down_scrape_carries_the_pool_error() {
    let scrape = Scrape {
        duration: Duration::from_millis(10),
        outcome: Err(FetchError::DeadlineExceeded(Source::Pools)),
    };
    let report = scrape.report();
    assert!(!report.up);
    assert!(report.pools.is_none());
    assert!(report.warnings.is_empty());
    assert!(report.error.unwrap().contains("pools"));
}

#[test]
fn command_error_messages() {
    let exit = CommandError::Exit {
        program: "systemctl".into(),
        code: Some(3),
        stdout: b"inactive\n".to_vec(),
        stderr: String::new(),
    };
    assert!(exit.to_string().contains("status 3"));
    assert_eq!(exit.stdout(), b"inactive\n");

    let killed = CommandError::Exit {
        program: "zpool".into(),
        code: None,
        stdout: vec![],
        stderr: String::new(),
    };
    assert!(killed.to_string().contains("signal"));
}
