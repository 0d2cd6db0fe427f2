use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::host::DEFAULT_SERVICE_KEYS;

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scrape: ScrapeConfig,
    pub zfs: ZfsConfig,
    pub host: HostConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the Prometheus exposition is served under.
    pub metrics_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 9134,
            metrics_path: "/metrics".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Total budget for every command of one scrape.
    pub timeout_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZfsConfig {
    pub zpool_path: String,
    pub zfs_path: String,
}

impl Default for ZfsConfig {
    fn default() -> Self {
        Self {
            zpool_path: "zpool".into(),
            zfs_path: "zfs".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub systemctl_path: String,
    /// Service keys to monitor.
    pub services: Vec<String>,
    /// Candidate units per key; replaces (or adds to) the built-in table.
    pub units: BTreeMap<String, Vec<String>>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            systemctl_path: "systemctl".into(),
            services: DEFAULT_SERVICE_KEYS.iter().map(|s| s.to_string()).collect(),
            units: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used when RUST_LOG is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Loads `CONFIG_FILE` (or `config.toml`), applies `ZFS_EXPORTER_*`
    /// overrides and validates. Without `CONFIG_FILE` a missing `config.toml`
    /// means built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::read_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::read_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        Ok(toml::from_str(&s)?)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `ZFS_EXPORTER_*` overrides. `lookup` returns the raw value of
    /// a variable, so tests can inject values without touching the process
    /// environment.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("ZFS_EXPORTER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("ZFS_EXPORTER_PORT") {
            self.server.port = v
                .parse()
                .map_err(|e| anyhow::anyhow!("ZFS_EXPORTER_PORT {:?}: {}", v, e))?;
        }
        if let Some(v) = get("ZFS_EXPORTER_METRICS_PATH") {
            self.server.metrics_path = v;
        }
        if let Some(v) = get("ZFS_EXPORTER_SCRAPE_TIMEOUT_MS") {
            self.scrape.timeout_ms = v
                .parse()
                .map_err(|e| anyhow::anyhow!("ZFS_EXPORTER_SCRAPE_TIMEOUT_MS {:?}: {}", v, e))?;
        }
        if let Some(v) = get("ZFS_EXPORTER_ZPOOL_PATH") {
            self.zfs.zpool_path = v;
        }
        if let Some(v) = get("ZFS_EXPORTER_ZFS_PATH") {
            self.zfs.zfs_path = v;
        }
        if let Some(v) = get("ZFS_EXPORTER_SERVICES") {
            self.host.services = parse_service_list(&v);
        }
        if let Some(v) = get("ZFS_EXPORTER_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.server.metrics_path.starts_with('/') && self.server.metrics_path != "/",
            "server.metrics_path must start with '/' and not be '/', got {:?}",
            self.server.metrics_path
        );
        anyhow::ensure!(
            self.scrape.timeout_ms > 0,
            "scrape.timeout_ms must be > 0, got {}",
            self.scrape.timeout_ms
        );
        anyhow::ensure!(
            !self.zfs.zpool_path.is_empty(),
            "zfs.zpool_path must be non-empty"
        );
        anyhow::ensure!(!self.zfs.zfs_path.is_empty(), "zfs.zfs_path must be non-empty");
        anyhow::ensure!(
            !self.host.systemctl_path.is_empty(),
            "host.systemctl_path must be non-empty"
        );
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.logging.level.as_str()),
            "logging.level must be one of {:?}, got {:?}",
            LOG_LEVELS,
            self.logging.level
        );
        Ok(())
    }

    /// Checks that the zpool and zfs binaries exist and are executable.
    /// Kept out of `validate` so configs can be checked on hosts without ZFS.
    pub fn validate_binaries(&self) -> anyhow::Result<()> {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        for (what, bin) in [("zpool", &self.zfs.zpool_path), ("zfs", &self.zfs.zfs_path)] {
            anyhow::ensure!(
                resolve_binary(bin, &path_var).is_some(),
                "{} binary not found or not executable: {}",
                what,
                bin
            );
        }
        Ok(())
    }

    pub fn scrape_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.scrape.timeout_ms)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Comma-separated service keys; blanks dropped.
pub fn parse_service_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Bare names are searched in `path_var`; anything containing a '/' is
/// checked directly.
pub fn resolve_binary(bin: &str, path_var: &std::ffi::OsStr) -> Option<PathBuf> {
    if bin.contains('/') {
        let p = PathBuf::from(bin);
        return is_executable(&p).then_some(p);
    }
    std::env::split_paths(path_var)
        .map(|dir| dir.join(bin))
        .find(|p| is_executable(p))
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
