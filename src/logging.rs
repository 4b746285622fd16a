//! Log subscriber setup for shells embedding the widget.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The `CLOUDLINK_LOG` environment variable overrides `default_filter`
/// (same syntax as `RUST_LOG`). Calling this more than once keeps the
/// first subscriber; later calls are no-ops so embedding shells and tests
/// can both call it freely.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_env("CLOUDLINK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
