//! Tracing initialisation for tests.
//!
//! [`init_test_tracing`] installs a process-wide subscriber at most once, so
//! every test may call it.

use tracing_subscriber::EnvFilter;

/// Route tracing output to the test harness writer. `RUST_LOG` overrides the
/// default of `redactle_core=debug`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("redactle_core=debug")),
        )
        .with_test_writer()
        .try_init();
}
