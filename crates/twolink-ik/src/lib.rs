//! Inverse kinematics for the planar two-link arm.
//!
//! Provides the closed-form [`KinematicsSolver`], forward kinematics
//! ([`ArmPose`]), and a Bevy plugin that solves one target per frame.
//!
//! # Architecture
//!
//! ```text
//! ArmGeometry ──► KinematicsSolver ──► JointAngles ──► forward_kinematics ──► ArmPose
//! ```
//!
//! The solver is a pure function of the target point and the geometry it
//! was built with. [`TwoLinkIkPlugin`] wraps it for the frame loop.

pub mod chain;
pub mod plugin;
pub mod solver;

pub use chain::{ArmPose, forward_kinematics};
pub use plugin::{ArmState, IkGoal, IkSolver, SolveOutcome, TwoLinkIkPlugin, solve_path};
pub use solver::KinematicsSolver;
