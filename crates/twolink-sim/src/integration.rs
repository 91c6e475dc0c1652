//! End-to-end tests for a complete tracking run.
//!
//! These tests exercise the whole pipeline: config validation, path
//! sampling, per-frame playback, IK solving and statistics tracking.

#[cfg(test)]
mod tests {
    use twolink_core::config::{AnimationConfig, ArmConfig, PathConfig, TwoLinkConfig};
    use twolink_core::time::SimTime;
    use twolink_core::{LineEquation, TargetPoint};
    use twolink_ik::{ArmState, SolveOutcome};

    use twolink_test_utils::{short_config, step_n};

    use crate::builder::SceneBuilder;
    use crate::playback::PathPlayback;

    // -------------------------------------------------------------------
    // Default run
    // -------------------------------------------------------------------

    #[test]
    fn default_run_plays_path_twice() {
        let mut scene = SceneBuilder::new().build().unwrap();
        assert_eq!(scene.run(), 162);

        let stats = scene.stats();
        assert_eq!(stats.frames_played, 162);
        // x = 2, 4, 6 fall inside the minimum reach on both passes.
        assert_eq!(stats.frames_skipped, 6);
        assert_eq!(stats.frames_solved, 156);
    }

    #[test]
    fn default_run_skips_inner_points() {
        let mut scene = SceneBuilder::new().build().unwrap();
        scene.run();

        let history = scene.history();
        assert_eq!(history.len(), 156);
        let skipped: Vec<u64> = (0..162)
            .filter(|f| !history.samples().iter().any(|s| s.frame == *f))
            .collect();
        assert_eq!(skipped, vec![39, 40, 41, 120, 121, 122]);
        for s in history.samples() {
            assert!(!(39..=41).contains(&s.path_index));
        }
    }

    #[test]
    fn frame_timestamps_follow_interval() {
        let mut scene = SceneBuilder::new().build().unwrap();
        scene.run();

        for s in scene.history().samples() {
            assert_eq!(s.time_ns, s.frame * 100_000_000);
        }
        assert_eq!(scene.app.world().resource::<SimTime>().millis(), 16_100);
    }

    #[test]
    fn solved_angles_reach_their_targets() {
        let mut scene = SceneBuilder::new().build().unwrap();
        let path = scene.path.clone();
        scene.run();

        let solver = scene.app.world().resource::<twolink_ik::IkSolver>().0;
        for s in scene.history().samples() {
            let target = path[s.path_index];
            let pose = solver.forward(s.angles);
            assert!((pose.effector.x - target.x).abs() < 1e-9);
            assert!((pose.effector.y - target.y).abs() < 1e-9);
        }
    }

    #[test]
    fn unreachable_frame_keeps_last_pose() {
        let mut scene = SceneBuilder::new().build().unwrap();
        // Frames 0..=38 are solvable; frame 39 (x = 2) is not.
        for _ in 0..39 {
            scene.step();
        }
        let before = *scene.app.world().resource::<ArmState>();
        assert_eq!(before.outcome, SolveOutcome::Solved);

        scene.step();
        let after = *scene.app.world().resource::<ArmState>();
        assert_eq!(after.outcome, SolveOutcome::Unreachable);
        assert_eq!(after.target, Some(TargetPoint::new(2.0, 9.0)));
        assert_eq!(after.pose, before.pose);
    }

    // -------------------------------------------------------------------
    // Configured runs
    // -------------------------------------------------------------------

    #[test]
    fn single_pass_with_custom_interval() {
        let config = TwoLinkConfig {
            animation: AnimationConfig {
                frame_interval_ms: 40,
                repeat: 1,
            },
            ..TwoLinkConfig::default()
        };
        let mut scene = SceneBuilder::new().with_config(config).build().unwrap();
        assert_eq!(scene.run(), 81);
        assert_eq!(scene.stats().frames_skipped, 3);
        assert_eq!(scene.app.world().resource::<SimTime>().millis(), 80 * 40);
    }

    #[test]
    fn longer_arm_solves_every_frame() {
        let config = TwoLinkConfig {
            arm: ArmConfig {
                segment1_length: 60.0,
                segment2_length: 60.0,
            },
            path: PathConfig {
                line: LineEquation::new(0.0, 30.0),
                ..PathConfig::default()
            },
            ..TwoLinkConfig::default()
        };
        let mut scene = SceneBuilder::new().with_config(config).build().unwrap();
        scene.run();
        let stats = scene.stats();
        assert!(stats.frames_played > 0);
        assert_eq!(stats.frames_skipped, 0);
        assert_eq!(stats.solve_rate(), Some(1.0));
    }

    #[test]
    fn empty_path_runs_no_frames() {
        let config = TwoLinkConfig {
            path: PathConfig {
                line: LineEquation::new(0.0, 500.0),
                ..PathConfig::default()
            },
            ..TwoLinkConfig::default()
        };
        let mut scene = SceneBuilder::new().with_config(config).build().unwrap();
        assert!(scene.path.is_empty());
        assert_eq!(scene.run(), 0);
        assert_eq!(scene.stats().frames_played, 0);
        assert!(scene.history().is_empty());
    }

    #[test]
    fn short_scan_solves_min_reach_boundary() {
        let mut scene = SceneBuilder::new().with_config(short_config()).build().unwrap();
        assert_eq!(scene.path.len(), 5);
        assert_eq!(scene.run(), 10);
        assert_eq!(scene.stats().frames_solved, 10);
    }

    #[test]
    fn updates_after_finish_are_idle() {
        let mut scene = SceneBuilder::new().with_config(short_config()).build().unwrap();
        scene.run();
        step_n(&mut scene.app, 3);
        assert_eq!(scene.stats().frames_played, 10);
        assert_eq!(
            scene.app.world().resource::<ArmState>().outcome,
            SolveOutcome::Idle
        );
    }

    #[test]
    fn frames_override_loops_past_path_end() {
        let mut scene = SceneBuilder::new().with_frames(100).build().unwrap();
        scene.run();
        let playback = scene.app.world().resource::<PathPlayback>();
        assert_eq!(playback.frames_played(), 100);
        let last = scene.history().samples().last().unwrap();
        assert_eq!(last.frame, 99);
        assert_eq!(last.path_index, 99 - 81);
    }
}
