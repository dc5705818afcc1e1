/// Crate version reported by `--version`
pub fn current_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Compile timestamp injected by build.rs, RFC 3339 (e.g. "2025-02-09T15:30:45Z")
pub fn build_timestamp() -> Option<&'static str> {
    option_env!("BUILD_TIMESTAMP")
}

/// Logs version details, for `-v` runs
pub fn log_version() {
    tracing::debug!(
        "check-snmp-jails {} (built {})",
        current_version(),
        build_timestamp().unwrap_or("unknown")
    );
}
