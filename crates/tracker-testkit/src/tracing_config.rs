//! Tracing configuration for test output.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize tracing for tests.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Uses `RUST_LOG` if set, otherwise `info` with debug output for the
/// tracker crates.
pub fn init_test_tracing() {
    init_test_tracing_with_filter(
        &std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "info,tracker_graphql=debug,anilist=debug".to_string()),
    );
}

/// Initialize tracing with a specific filter.
pub fn init_test_tracing_with_filter(filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::new(filter);

        // Another harness may already have installed a global subscriber.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_ansi(false)
                    .compact(),
            )
            .try_init();
    });
}

/// Initialize silent tracing (suppresses all output).
///
/// Useful for tests that intentionally trigger errors and don't want log noise.
pub fn init_test_tracing_silent() {
    init_test_tracing_with_filter("off");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        init_test_tracing_silent();
    }
}
