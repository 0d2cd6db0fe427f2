// Prometheus exposition of scrapes

use std::time::Duration;
use zfs_exporter::error::{CommandError, FetchError};
use zfs_exporter::metrics::render;
use zfs_exporter::models::*;

fn pool(name: &str, health: PoolHealth, fragmentation: f64) -> Pool {
    Pool {
        name: name.into(),
        size: 1000,
        allocated: 400,
        free: 600,
        fragmentation,
        dedup_ratio: 1.25,
        health,
        read_only: false,
    }
}

fn dataset(name: &str, kind: DatasetKind, nfs: bool) -> Dataset {
    Dataset {
        name: name.into(),
        pool: zfs_exporter::zfs::extract_pool_name(name).into(),
        used: 10,
        available: 20,
        referenced: 30,
        kind,
        share_nfs: nfs,
        share_smb: false,
    }
}

fn spawn_error(program: &str) -> CommandError {
    CommandError::Spawn {
        program: program.into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}

fn up_scrape() -> Scrape {
    Scrape {
        duration: Duration::from_millis(250),
        outcome: Ok(Snapshot {
            pools: vec![pool("tank", PoolHealth::Degraded, 0.12)],
            datasets: Ok(vec![
                dataset("tank", DatasetKind::Filesystem, false),
                dataset("tank/media", DatasetKind::Filesystem, true),
            ]),
            scan_statuses: Ok(vec![ScanStatus {
                pool: "tank".into(),
                scrub: false,
                resilver: true,
                progress: 0.755,
            }]),
            services: Ok(vec![
                ServiceStatus {
                    name: "nfs".into(),
                    active: true,
                },
                ServiceStatus {
                    name: "smb".into(),
                    active: false,
                },
            ]),
        }),
    }
}

#[test]
fn up_scrape_renders_every_family() {
    let text = render(&up_scrape()).unwrap();

    assert!(text.contains("zfs_up 1"));
    assert!(text.contains("zfs_scrape_duration_seconds 0.25"));
    assert!(text.contains("zfs_pool_size_bytes{pool=\"tank\"} 1000"));
    assert!(text.contains("zfs_pool_allocated_bytes{pool=\"tank\"} 400"));
    assert!(text.contains("zfs_pool_free_bytes{pool=\"tank\"} 600"));
    assert!(text.contains("zfs_pool_fragmentation_ratio{pool=\"tank\"} 0.12"));
    assert!(text.contains("zfs_pool_dedup_ratio{pool=\"tank\"} 1.25"));
    assert!(text.contains("zfs_pool_readonly{pool=\"tank\"} 0"));
    assert!(text.contains("zfs_pool_resilver_active{pool=\"tank\"} 1"));
    assert!(text.contains("zfs_pool_scrub_active{pool=\"tank\"} 0"));
    assert!(text.contains("zfs_pool_scan_progress_ratio{pool=\"tank\"} 0.755"));
    assert!(text.contains(
        "zfs_dataset_share_nfs{dataset=\"tank/media\",pool=\"tank\",type=\"filesystem\"} 1"
    ));
    assert!(text.contains(
        "zfs_dataset_used_bytes{dataset=\"tank\",pool=\"tank\",type=\"filesystem\"} 10"
    ));
    assert!(text.contains("zfs_service_up{service=\"nfs\"} 1"));
    assert!(text.contains("zfs_service_up{service=\"smb\"} 0"));
}

#[test]
fn health_is_a_state_set() {
    let text = render(&up_scrape()).unwrap();

    assert!(text.contains("zfs_pool_health{pool=\"tank\",state=\"degraded\"} 1"));
    for state in ["online", "faulted", "offline", "removed", "unavail"] {
        assert!(
            text.contains(&format!(
                "zfs_pool_health{{pool=\"tank\",state=\"{state}\"}} 0"
            )),
            "missing zero series for {state}"
        );
    }
}

#[test]
fn unavailable_fragmentation_is_nan() {
    let mut scrape = up_scrape();
    if let Ok(snapshot) = &mut scrape.outcome {
        snapshot.pools[0].fragmentation = f64::NAN;
    }
    let text = render(&scrape).unwrap();
    assert!(text.contains("zfs_pool_fragmentation_ratio{pool=\"tank\"} NaN"));
}

#[test]
fn down_scrape_only_reports_up_and_duration() {
    let scrape = Scrape {
        duration: Duration::from_millis(5),
        outcome: Err(FetchError::PoolCommand(spawn_error("zpool"))),
    };
    let text = render(&scrape).unwrap();

    assert!(text.contains("zfs_up 0"));
    assert!(text.contains("zfs_scrape_duration_seconds"));
    assert!(!text.contains("zfs_pool_"));
    assert!(!text.contains("zfs_dataset_"));
    assert!(!text.contains("zfs_service_up"));
}

#[test]
fn failed_optional_source_omits_only_its_series() {
    let mut scrape = up_scrape();
    if let Ok(snapshot) = &mut scrape.outcome {
        snapshot.datasets = Err(FetchError::DatasetCommand(spawn_error("zfs")));
    }
    let text = render(&scrape).unwrap();

    assert!(text.contains("zfs_up 1"));
    assert!(!text.contains("zfs_dataset_"));
    assert!(text.contains("zfs_pool_size_bytes"));
    assert!(text.contains("zfs_pool_scrub_active"));
    assert!(text.contains("zfs_service_up"));
}

#[test]
fn duration_help_covers_the_whole_scrape() {
    let text = render(&up_scrape()).unwrap();
    assert!(text.contains(
        "# HELP zfs_scrape_duration_seconds Time taken by the whole scrape, optional sources included."
    ));
}
