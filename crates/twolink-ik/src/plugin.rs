//! Bevy ECS integration for the IK solver.
//!
//! Provides [`TwoLinkIkPlugin`] which adds an IK solve system that reads the
//! [`IkGoal`] target and writes the result into [`ArmState`] each frame.
//!
//! # Usage
//!
//! 1. Insert an [`IkSolver`] for your geometry (the plugin falls back to
//!    the default 50/40 mm arm).
//! 2. Add [`TwoLinkIkPlugin`] to your app.
//! 3. Set [`IkGoal`] from your own system in [`TwoLinkSet::Advance`].
//!
//! The plugin's system runs in [`TwoLinkSet::Solve`].

use bevy::prelude::*;

use twolink_core::{JointAngles, TargetPath, TargetPoint, TwoLinkSet};

use crate::chain::ArmPose;
use crate::solver::KinematicsSolver;

/// Bevy plugin that adds IK solving each frame.
pub struct TwoLinkIkPlugin;

impl Plugin for TwoLinkIkPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<IkSolver>()
            .init_resource::<IkGoal>()
            .init_resource::<ArmState>()
            .add_systems(Update, ik_solve_system.in_set(TwoLinkSet::Solve));
    }
}

/// Resource wrapping the solver used by [`ik_solve_system`].
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct IkSolver(pub KinematicsSolver);

/// Current IK target. `None` means IK is idle this frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct IkGoal(pub Option<TargetPoint>);

/// What happened to the goal in the most recent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolveOutcome {
    /// No goal was set.
    #[default]
    Idle,
    /// The goal was reachable; `ArmState` holds the fresh solution.
    Solved,
    /// The goal was outside the annulus; the previous pose is kept.
    Unreachable,
}

/// Latest arm configuration.
///
/// On an unreachable frame only `target` and `outcome` change, so renderers
/// keep drawing the last reachable pose.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ArmState {
    pub target: Option<TargetPoint>,
    pub angles: Option<JointAngles>,
    pub pose: Option<ArmPose>,
    pub outcome: SolveOutcome,
}

impl ArmState {
    /// Whether this frame produced a new solution.
    pub fn solved_this_frame(&self) -> bool {
        self.outcome == SolveOutcome::Solved
    }
}

/// System that solves IK for the current [`IkGoal`].
#[allow(clippy::needless_pass_by_value)]
pub fn ik_solve_system(solver: Res<IkSolver>, goal: Res<IkGoal>, mut state: ResMut<ArmState>) {
    let Some(target) = goal.0 else {
        state.outcome = SolveOutcome::Idle;
        return;
    };

    state.target = Some(target);
    if let Some(angles) = solver.0.solve_point(target) {
        state.angles = Some(angles);
        state.pose = Some(solver.0.forward(angles));
        state.outcome = SolveOutcome::Solved;
    } else {
        debug!("twolink-ik: target {target} unreachable, skipping frame");
        state.outcome = SolveOutcome::Unreachable;
    }
}

/// Convenience: solve every point of a path without the ECS.
///
/// The result is index-aligned with `path`; unreachable points are `None`.
pub fn solve_path(solver: &KinematicsSolver, path: &TargetPath) -> Vec<Option<JointAngles>> {
    path.iter().map(|&p| solver.solve_point(p)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use twolink_core::{ArmGeometry, TwoLinkCorePlugin};
    use twolink_test_utils::mixed_path;

    fn ik_app() -> App {
        let mut app = App::new();
        app.add_plugins(TwoLinkCorePlugin);
        app.add_plugins(TwoLinkIkPlugin);
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn plugin_builds() {
        let mut app = ik_app();
        app.update();

        assert!(app.world().get_resource::<IkSolver>().is_some());
        assert!(app.world().get_resource::<IkGoal>().is_some());
        assert_eq!(app.world().resource::<ArmState>().outcome, SolveOutcome::Idle);
    }

    #[test]
    fn plugin_keeps_inserted_solver() {
        let geometry = ArmGeometry::new(100.0, 20.0).unwrap();
        let mut app = App::new();
        app.insert_resource(IkSolver(KinematicsSolver::new(geometry)));
        app.add_plugins((TwoLinkCorePlugin, TwoLinkIkPlugin));
        app.update();

        assert_eq!(app.world().resource::<IkSolver>().0.geometry(), &geometry);
    }

    #[test]
    fn ik_system_writes_solution() {
        let mut app = ik_app();
        app.world_mut().resource_mut::<IkGoal>().0 = Some(TargetPoint::new(50.0, 0.0));
        app.update();

        let state = app.world().resource::<ArmState>();
        assert!(state.solved_this_frame());
        assert!(state.angles.is_some());
        let pose = state.pose.unwrap();
        assert!((pose.effector.x - 50.0).abs() < 1e-9);
        assert!(pose.effector.y.abs() < 1e-9);
    }

    #[test]
    fn unreachable_goal_keeps_previous_pose() {
        let mut app = ik_app();
        app.world_mut().resource_mut::<IkGoal>().0 = Some(TargetPoint::new(60.0, 20.0));
        app.update();
        let before = *app.world().resource::<ArmState>();

        app.world_mut().resource_mut::<IkGoal>().0 = Some(TargetPoint::new(200.0, 0.0));
        app.update();

        let after = app.world().resource::<ArmState>();
        assert_eq!(after.outcome, SolveOutcome::Unreachable);
        assert_eq!(after.target, Some(TargetPoint::new(200.0, 0.0)));
        assert_eq!(after.angles, before.angles);
        assert_eq!(after.pose, before.pose);
    }

    #[test]
    fn clearing_goal_goes_idle() {
        let mut app = ik_app();
        app.world_mut().resource_mut::<IkGoal>().0 = Some(TargetPoint::new(60.0, 20.0));
        app.update();
        app.world_mut().resource_mut::<IkGoal>().0 = None;
        app.update();

        let state = app.world().resource::<ArmState>();
        assert_eq!(state.outcome, SolveOutcome::Idle);
        assert!(state.pose.is_some());
    }

    #[test]
    fn solve_path_is_index_aligned() {
        let solver = KinematicsSolver::default();
        let solutions = solve_path(&solver, &mixed_path());
        assert_eq!(solutions.len(), 3);
        assert!(solutions[0].is_some());
        assert!(solutions[1].is_none());
        assert!(solutions[2].is_some());
    }
}
