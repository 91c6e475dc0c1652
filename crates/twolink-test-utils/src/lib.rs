//! Shared test fixtures and utilities for the twolink crates.
//!
//! Provides reusable helpers for stepping Bevy test apps, default
//! geometry and config fixtures, and deterministic RNG setup.

pub mod app;
pub mod fixtures;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::step_n;
pub use fixtures::{default_geometry, default_line, mixed_path, short_config};
pub use rng::{random_elbow_up_angles, random_point, random_reachable_point, seeded_rng};
