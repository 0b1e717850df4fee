// tests/common.rs
//! Shared test setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route tracing output through the test harness; respects RUST_LOG
#[allow(dead_code)]
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}
