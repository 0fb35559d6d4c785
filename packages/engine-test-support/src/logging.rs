//! Tracing initialization for integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static GUARD: OnceCell<()> = OnceCell::new();

/// Idempotent, race-safe tracing setup.
///
/// Reads `ENGINE_TEST_LOG` first, then `RUST_LOG`, defaulting to a quiet
/// `warn`. Output goes through the test writer so cargo captures it per test,
/// and an already-installed subscriber is never clobbered.
pub fn init() {
    GUARD.get_or_init(|| {
        let filter = std::env::var("ENGINE_TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
