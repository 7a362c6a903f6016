//! Stretchform Test Harness - Fixtures and scenarios
//!
//! This crate provides:
//! - Synthetic pose frames with exact joint angles
//! - Session scenario runners
//! - Tracing setup for test output

pub mod fixtures;
pub mod scenario;

pub use fixtures::*;
pub use scenario::*;

/// Install a test-friendly tracing subscriber, filtered by `RUST_LOG`.
/// Safe to call from every test; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
