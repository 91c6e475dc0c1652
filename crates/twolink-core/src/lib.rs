// twolink-core: Types, config, time, errors and system ordering for the two-link arm.

pub mod config;
pub mod error;
pub mod output;
pub mod time;
pub mod types;

use bevy::prelude::*;

pub use error::{ConfigError, TwoLinkError};
pub use types::{ArmGeometry, JointAngles, LineEquation, TargetPath, TargetPoint};

// ---------------------------------------------------------------------------
// System ordering
// ---------------------------------------------------------------------------

/// Per-frame system phases, chained in this order inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwoLinkSet {
    /// Pick the next target point and advance the frame clock.
    Advance,
    /// Solve inverse kinematics for the current target.
    Solve,
    /// Update statistics and angle history from the solution.
    Track,
}

// ---------------------------------------------------------------------------
// TwoLinkCorePlugin
// ---------------------------------------------------------------------------

/// Registers [`TwoLinkSet`] ordering and the [`SimTime`](time::SimTime) clock.
pub struct TwoLinkCorePlugin;

impl Plugin for TwoLinkCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<time::SimTime>().configure_sets(
            Update,
            (TwoLinkSet::Advance, TwoLinkSet::Solve, TwoLinkSet::Track).chain(),
        );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        TwoLinkCorePlugin, TwoLinkSet,
        config::{AnimationConfig, ArmConfig, OutputConfig, PathConfig, TwoLinkConfig},
        error::{ConfigError, TwoLinkError},
        time::SimTime,
        types::{ArmGeometry, JointAngles, LineEquation, TargetPath, TargetPoint},
    };
}
