// Build-time identity from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "name version", as logged at startup and shown on the landing page.
pub fn version_string() -> String {
    format!("{} {}", NAME, VERSION)
}
