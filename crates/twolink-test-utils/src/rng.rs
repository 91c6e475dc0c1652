//! Deterministic RNG utilities for reproducible tests.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use twolink_core::{ArmGeometry, JointAngles, TargetPoint};

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform point in the square `[-half, half]²`.
pub fn random_point(rng: &mut impl Rng, half: f64) -> TargetPoint {
    TargetPoint::new(rng.gen_range(-half..=half), rng.gen_range(-half..=half))
}

/// Point whose distance from the shoulder lies inside the reachable
/// annulus of `geometry`, shrunk by `margin` on both edges.
pub fn random_reachable_point(
    rng: &mut impl Rng,
    geometry: &ArmGeometry,
    margin: f64,
) -> TargetPoint {
    let r = rng.gen_range(geometry.min_reach() + margin..=geometry.max_reach() - margin);
    let a = rng.gen_range(-PI..PI);
    TargetPoint::new(r * a.cos(), r * a.sin())
}

/// Elbow-up joint angles with `theta2` kept `margin` away from 0 and π.
pub fn random_elbow_up_angles(rng: &mut impl Rng, margin: f64) -> JointAngles {
    JointAngles::new(rng.gen_range(-PI..PI), rng.gen_range(margin..PI - margin))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
