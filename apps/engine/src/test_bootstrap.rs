#![cfg(test)]

//! Unit-test bootstrap helpers.

pub mod logging {
    use once_cell::sync::OnceCell;
    use tracing_subscriber::EnvFilter;

    static GUARD: OnceCell<()> = OnceCell::new();

    /// Idempotent tracing setup for unit tests.
    ///
    /// Level comes from `ENGINE_TEST_LOG`, falling back to `RUST_LOG`, then a
    /// quiet `warn`. Safe to call from every test; only the first call does
    /// anything, and an already-installed subscriber is left in place.
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
}
