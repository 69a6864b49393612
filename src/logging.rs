use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber.
///
/// Logs go to stderr: stdout carries the JSON-RPC stream and must stay
/// clean. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
