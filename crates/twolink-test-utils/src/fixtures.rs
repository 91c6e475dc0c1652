//! Shared geometry, line and config fixtures.

use twolink_core::config::{PathConfig, TwoLinkConfig};
use twolink_core::{ArmGeometry, LineEquation, TargetPath, TargetPoint};

/// The 50/40 mm arm every default run uses.
pub fn default_geometry() -> ArmGeometry {
    ArmGeometry::default()
}

/// `y = -0.5x + 10`.
pub fn default_line() -> LineEquation {
    LineEquation::default()
}

/// Default config with a shorter scan, handy for fast runs.
///
/// Scans `x` over `[-20, 20]` by 10 mm: five points, all within reach, of
/// which `(0, 10)` sits exactly on the minimum reach.
pub fn short_config() -> TwoLinkConfig {
    TwoLinkConfig {
        path: PathConfig {
            x_min: -20.0,
            x_max: 20.0,
            step: 10.0,
            ..PathConfig::default()
        },
        ..TwoLinkConfig::default()
    }
}

/// Three-point path: reachable, inside the minimum reach, reachable.
pub fn mixed_path() -> TargetPath {
    TargetPath::new(vec![
        TargetPoint::new(50.0, 0.0),
        TargetPoint::new(5.0, 0.0),
        TargetPoint::new(0.0, 90.0),
    ])
}
