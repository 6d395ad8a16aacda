//! Diagnostic logging setup
//!
//! stdout carries MCP frames, so all log output goes to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable read when no filter is given explicitly
pub const LOG_ENV: &str = "BUJO_LOG";

/// Filter used when neither `--log-level` nor `BUJO_LOG` is set
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter: `explicit`, else `BUJO_LOG`, else `info`
///
/// An unparsable directive falls back to the default instead of failing
/// startup.
pub fn build_filter(explicit: Option<&str>) -> EnvFilter {
    let directive = explicit
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling it again is harmless.
pub fn init(explicit: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(explicit))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
