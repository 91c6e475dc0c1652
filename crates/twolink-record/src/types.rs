//! Serializable frame types written as MCAP message payloads.
//!
//! Each frame type corresponds to one MCAP topic:
//! - `AngleFrame` → `/angles`
//! - `PoseFrame`  → `/pose`

use serde::{Deserialize, Serialize};

use twolink_core::{JointAngles, TargetPoint};
use twolink_ik::ArmPose;

// ---------------------------------------------------------------------------
// AngleFrame
// ---------------------------------------------------------------------------

/// Joint angles solved at one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct AngleFrame {
    /// Frame timestamp in nanoseconds.
    pub timestamp_ns: u64,
    /// Zero-based frame number.
    pub frame: u64,
    /// Index of the frame's target within the path.
    pub path_index: usize,
    /// Shoulder angle (rad).
    pub theta1: f64,
    /// Elbow angle (rad).
    pub theta2: f64,
}

impl AngleFrame {
    pub const fn new(timestamp_ns: u64, frame: u64, path_index: usize, angles: JointAngles) -> Self {
        Self {
            timestamp_ns,
            frame,
            path_index,
            theta1: angles.theta1,
            theta2: angles.theta2,
        }
    }

    pub const fn angles(&self) -> JointAngles {
        JointAngles::new(self.theta1, self.theta2)
    }
}

// ---------------------------------------------------------------------------
// PoseFrame
// ---------------------------------------------------------------------------

/// Arm geometry drawn at one animation frame, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct PoseFrame {
    /// Frame timestamp in nanoseconds.
    pub timestamp_ns: u64,
    pub elbow_x: f64,
    pub elbow_y: f64,
    pub effector_x: f64,
    pub effector_y: f64,
    /// Target the pose was solved for.
    pub target_x: f64,
    pub target_y: f64,
}

impl PoseFrame {
    pub fn new(timestamp_ns: u64, pose: &ArmPose, target: TargetPoint) -> Self {
        Self {
            timestamp_ns,
            elbow_x: pose.elbow.x,
            elbow_y: pose.elbow.y,
            effector_x: pose.effector.x,
            effector_y: pose.effector.y,
            target_x: target.x,
            target_y: target.y,
        }
    }

    /// Distance between the drawn end-effector and its target.
    pub fn tracking_error(&self) -> f64 {
        (self.effector_x - self.target_x).hypot(self.effector_y - self.target_y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
