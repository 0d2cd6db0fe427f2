use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use zfs_exporter::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = config::AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&app_config.logging.level));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    if let Err(e) = app_config.validate_binaries() {
        tracing::error!(error = %e, "Configuration validation failed");
        return Err(e);
    }

    let services = host::build_service_map(&app_config.host.services, &app_config.host.units);
    tracing::info!(
        version = %version::version_string(),
        listen = %app_config.listen_address(),
        zpool_path = %app_config.zfs.zpool_path,
        zfs_path = %app_config.zfs.zfs_path,
        services = ?services.keys().collect::<Vec<_>>(),
        scrape_timeout_ms = app_config.scrape.timeout_ms,
        "Starting zfs_exporter"
    );

    let runner: Arc<dyn runner::CommandRunner> = Arc::new(runner::SystemRunner::new());
    let client = zfs::ZfsClient::new(
        runner.clone(),
        app_config.zfs.zpool_path.clone(),
        app_config.zfs.zfs_path.clone(),
    );
    let service_checker =
        host::ServiceChecker::new(runner, app_config.host.systemctl_path.clone());
    let collector = Arc::new(collector::Collector::new(
        client,
        service_checker,
        services,
        app_config.scrape_timeout(),
    ));

    let addr = app_config.listen_address();
    let app = routes::app(collector, app_config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received shutdown signal");
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
