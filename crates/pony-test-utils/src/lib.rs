//! Shared helpers for pony tests: logging, fixture input and line diffs.

pub mod fixtures;
pub mod terminal;

pub use fixtures::TestFixtures;
pub use terminal::{assert_lines, LineComparator};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset; parser diagnostics are trace level
const DEFAULT_TEST_FILTER: &str = "pony=debug,pony_terminal=trace";

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness, once per test binary
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}
