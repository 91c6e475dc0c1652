//! Forward kinematics of the planar two-link chain.
//!
//! The chain is shoulder (at the origin) → segment 1 → elbow → segment 2 →
//! end-effector. Each joint contributes a rotation about the plane normal
//! followed by a translation along the rotated segment, composed as
//! [`Isometry2`] transforms.

use nalgebra::{Isometry2, Point2};

use twolink_core::{ArmGeometry, JointAngles};

/// Joint and end-effector positions for one joint configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmPose {
    /// Elbow joint position (end of segment 1).
    pub elbow: Point2<f64>,
    /// End-effector position (end of segment 2).
    pub effector: Point2<f64>,
}

impl ArmPose {
    /// The fixed shoulder joint.
    #[must_use]
    pub fn shoulder() -> Point2<f64> {
        Point2::origin()
    }

    /// Segment end points: `[(shoulder, elbow), (elbow, effector)]`.
    #[must_use]
    pub fn segments(&self) -> [(Point2<f64>, Point2<f64>); 2] {
        [(Self::shoulder(), self.elbow), (self.elbow, self.effector)]
    }
}

/// Compute joint positions for `angles` under `geometry`.
///
/// Equivalent to `x1 = L1·cos θ1`, `y1 = L1·sin θ1`,
/// `x2 = x1 + L2·cos(θ1 + θ2)`, `y2 = y1 + L2·sin(θ1 + θ2)`.
#[must_use]
pub fn forward_kinematics(geometry: &ArmGeometry, angles: JointAngles) -> ArmPose {
    let upper = Isometry2::rotation(angles.theta1)
        * Isometry2::translation(geometry.segment1_length(), 0.0);
    let fore = upper
        * Isometry2::rotation(angles.theta2)
        * Isometry2::translation(geometry.segment2_length(), 0.0);

    ArmPose {
        elbow: upper * Point2::origin(),
        effector: fore * Point2::origin(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
