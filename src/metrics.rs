// Prometheus text exposition of a Scrape.
//
// Every render builds a fresh registry: series only exist for what the
// scrape actually saw, so a vanished pool or dataset disappears from the
// next exposition instead of lingering with a stale value.

use crate::models::{Dataset, Pool, PoolHealth, ScanStatus, Scrape, ServiceStatus};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "zfs";

/// Content type of [`render`]'s output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

fn gauge(registry: &Registry, subsystem: &str, name: &str, help: &str) -> prometheus::Result<Gauge> {
    let g = Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE).subsystem(subsystem))?;
    registry.register(Box::new(g.clone()))?;
    Ok(g)
}

fn gauge_vec(
    registry: &Registry,
    subsystem: &str,
    name: &str,
    help: &str,
    labels: &[&str],
) -> prometheus::Result<GaugeVec> {
    let g = GaugeVec::new(
        Opts::new(name, help).namespace(NAMESPACE).subsystem(subsystem),
        labels,
    )?;
    registry.register(Box::new(g.clone()))?;
    Ok(g)
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// Renders the scrape as Prometheus text.
pub fn render(scrape: &Scrape) -> prometheus::Result<String> {
    let registry = Registry::new();

    let up = gauge(&registry, "", "up", "Whether ZFS commands succeeded.")?;
    let duration = gauge(
        &registry,
        "",
        "scrape_duration_seconds",
        "Time taken by the whole scrape, optional sources included.",
    )?;
    up.set(flag(scrape.is_up()));
    duration.set(scrape.duration.as_secs_f64());

    if let Some(snapshot) = scrape.snapshot() {
        emit_pools(&registry, &snapshot.pools)?;
        if let Ok(datasets) = &snapshot.datasets {
            emit_datasets(&registry, datasets)?;
        }
        if let Ok(scans) = &snapshot.scan_statuses {
            emit_scans(&registry, scans)?;
        }
        if let Ok(services) = &snapshot.services {
            emit_services(&registry, services)?;
        }
    }

    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

fn emit_pools(registry: &Registry, pools: &[Pool]) -> prometheus::Result<()> {
    let labels = &["pool"];
    let size = gauge_vec(registry, "pool", "size_bytes", "Total pool size in bytes.", labels)?;
    let allocated = gauge_vec(
        registry,
        "pool",
        "allocated_bytes",
        "Allocated space in bytes.",
        labels,
    )?;
    let free = gauge_vec(registry, "pool", "free_bytes", "Free space in bytes.", labels)?;
    let fragmentation = gauge_vec(
        registry,
        "pool",
        "fragmentation_ratio",
        "Pool fragmentation as a ratio (0-1), NaN if unavailable.",
        labels,
    )?;
    let dedup = gauge_vec(registry, "pool", "dedup_ratio", "Deduplication ratio.", labels)?;
    let readonly = gauge_vec(
        registry,
        "pool",
        "readonly",
        "1 if pool is read-only, 0 otherwise.",
        labels,
    )?;
    let health = gauge_vec(
        registry,
        "pool",
        "health",
        "1 if pool is in the labeled state, 0 otherwise.",
        &["pool", "state"],
    )?;

    for p in pools {
        let name = p.name.as_str();
        size.with_label_values(&[name]).set(p.size as f64);
        allocated.with_label_values(&[name]).set(p.allocated as f64);
        free.with_label_values(&[name]).set(p.free as f64);
        fragmentation.with_label_values(&[name]).set(p.fragmentation);
        dedup.with_label_values(&[name]).set(p.dedup_ratio);
        readonly.with_label_values(&[name]).set(flag(p.read_only));

        // State-set: one series per known state.
        for state in PoolHealth::KNOWN.iter() {
            let label = state.state_label();
            health
                .with_label_values(&[name, label.as_str()])
                .set(flag(*state == p.health));
        }
    }
    Ok(())
}

fn emit_scans(registry: &Registry, scans: &[ScanStatus]) -> prometheus::Result<()> {
    let labels = &["pool"];
    let scrub = gauge_vec(
        registry,
        "pool",
        "scrub_active",
        "1 if a scrub is in progress, 0 otherwise.",
        labels,
    )?;
    let resilver = gauge_vec(
        registry,
        "pool",
        "resilver_active",
        "1 if a resilver (rebuild) is in progress, 0 otherwise.",
        labels,
    )?;
    let progress = gauge_vec(
        registry,
        "pool",
        "scan_progress_ratio",
        "0-1 progress of active scan, 0 if no scan active.",
        labels,
    )?;

    for s in scans {
        let pool = s.pool.as_str();
        scrub.with_label_values(&[pool]).set(flag(s.scrub));
        resilver.with_label_values(&[pool]).set(flag(s.resilver));
        progress.with_label_values(&[pool]).set(s.progress);
    }
    Ok(())
}

fn emit_datasets(registry: &Registry, datasets: &[Dataset]) -> prometheus::Result<()> {
    let labels = &["dataset", "type", "pool"];
    let used = gauge_vec(
        registry,
        "dataset",
        "used_bytes",
        "Space consumed by dataset.",
        labels,
    )?;
    let available = gauge_vec(
        registry,
        "dataset",
        "available_bytes",
        "Space available to dataset.",
        labels,
    )?;
    let referenced = gauge_vec(
        registry,
        "dataset",
        "referenced_bytes",
        "Space referenced by dataset.",
        labels,
    )?;
    let share_nfs = gauge_vec(
        registry,
        "dataset",
        "share_nfs",
        "1 if NFS sharing is enabled, 0 otherwise.",
        labels,
    )?;
    let share_smb = gauge_vec(
        registry,
        "dataset",
        "share_smb",
        "1 if SMB sharing is enabled, 0 otherwise.",
        labels,
    )?;

    for d in datasets {
        let values = [d.name.as_str(), d.kind.as_str(), d.pool.as_str()];
        used.with_label_values(&values).set(d.used as f64);
        available.with_label_values(&values).set(d.available as f64);
        referenced.with_label_values(&values).set(d.referenced as f64);
        share_nfs.with_label_values(&values).set(flag(d.share_nfs));
        share_smb.with_label_values(&values).set(flag(d.share_smb));
    }
    Ok(())
}

fn emit_services(registry: &Registry, services: &[ServiceStatus]) -> prometheus::Result<()> {
    let service_up = gauge_vec(
        registry,
        "",
        "service_up",
        "1 if systemd unit is active, 0 otherwise.",
        &["service"],
    )?;
    for s in services {
        service_up
            .with_label_values(&[s.name.as_str()])
            .set(flag(s.active));
    }
    Ok(())
}
