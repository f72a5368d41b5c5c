//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging for the server.
///
/// `RUST_LOG` selects the filter, default `info`, for example
/// `RUST_LOG=holiday_calendar=debug,tower_http=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Verbose logging captured by the test harness. Safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
