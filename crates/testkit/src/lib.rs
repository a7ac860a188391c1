#![warn(missing_docs)]
//! Shared test surfaces: mesh fixtures, a scripted intersector and float
//! assertions.

mod fixtures;
mod scripted;

use glam::Vec3;
use tracing_subscriber::EnvFilter;

pub use fixtures::*;
pub use scripted::*;

/// Install a test-friendly tracing subscriber (idempotent).
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Assert two points are within `tolerance` of each other (Euclidean distance).
#[track_caller]
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32) {
    let distance = actual.distance(expected);
    assert!(
        distance <= tolerance,
        "expected {expected}, got {actual} (off by {distance}, tolerance {tolerance})"
    );
}
