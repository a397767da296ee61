use std::env;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Filter comes from `GPV_LOG`, then
/// `RUST_LOG`, then a quiet default; diagnostics go to stderr so stdout stays
/// reserved for the per-recording report.
pub fn init() {
    let filter = env::var("GPV_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
