//! Shared helpers for logrun's integration tests.

pub mod builders;
pub mod clock;
pub mod sinks;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness' capture.
///
/// Output shows up only for failing tests (or with `--nocapture`). Set
/// `RUST_LOG=logrun=debug` to see more than `info`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
