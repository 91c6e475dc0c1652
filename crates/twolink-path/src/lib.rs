//! Target path generation for the two-link arm.
//!
//! [`PathSampler`] scans a straight line over a configured x range and keeps
//! the points within the arm's maximum reach, in scan order. It shares the
//! [`ArmGeometry`](twolink_core::ArmGeometry) used by the kinematics solver
//! so that generated paths stay physically meaningful.

pub mod sampler;

pub use sampler::{MAX_SCAN_POINTS, PathSampler};
