//! Top-level Bevy plugin and scene builder for a tracking run.
//!
//! [`TwoLinkSimPlugin`] is a convenience meta-plugin that adds the core and
//! IK plugins in one call, plus path playback and tracking statistics.
//!
//! # Example
//!
//! ```no_run
//! use twolink_sim::SceneBuilder;
//!
//! let mut scene = SceneBuilder::new().build().unwrap();
//! scene.run();
//! println!("{} frames solved", scene.stats().frames_solved);
//! ```

pub mod builder;
pub mod playback;
pub mod stats;

#[cfg(test)]
mod integration;

use bevy::prelude::*;
use twolink_core::TwoLinkSet;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builder::{SceneBuilder, SpawnedScene};
pub use playback::{PathPlayback, PlaybackFrame};
pub use stats::{AngleHistory, AngleSample, TrackingStats};

// ---------------------------------------------------------------------------
// TwoLinkSimPlugin
// ---------------------------------------------------------------------------

/// Meta-plugin that adds the full tracking stack.
///
/// Includes:
/// - [`TwoLinkCorePlugin`](twolink_core::TwoLinkCorePlugin): system ordering and `SimTime`
/// - [`TwoLinkIkPlugin`](twolink_ik::TwoLinkIkPlugin): per-frame IK solve
/// - [`PathPlayback`] advance system, falling back to an empty path
/// - [`TrackingStats`] and [`AngleHistory`] with their tracking system
///
/// Does NOT include recording or plotting; add those based on your
/// application needs.
pub struct TwoLinkSimPlugin;

impl Plugin for TwoLinkSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(twolink_core::TwoLinkCorePlugin)
            .add_plugins(twolink_ik::TwoLinkIkPlugin)
            .init_resource::<PathPlayback>()
            .init_resource::<TrackingStats>()
            .init_resource::<AngleHistory>()
            .add_systems(
                Update,
                (
                    playback::advance_playback_system.in_set(TwoLinkSet::Advance),
                    stats::tracking_stats_system.in_set(TwoLinkSet::Track),
                ),
            );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use twolink_core::{TargetPath, TargetPoint};

    #[test]
    fn plugin_builds_without_panic() {
        let mut app = App::new();
        app.add_plugins(TwoLinkSimPlugin);
        app.finish();
        app.cleanup();
        app.update();

        assert!(app.world().get_resource::<TrackingStats>().is_some());
        assert!(
            app.world()
                .get_resource::<twolink_core::time::SimTime>()
                .is_some()
        );
        assert!(app.world().resource::<PathPlayback>().is_finished());
    }

    #[test]
    fn plugin_tracks_inserted_playback() {
        let path = TargetPath::new(vec![
            TargetPoint::new(50.0, 0.0),
            TargetPoint::new(5.0, 0.0),
        ]);
        let mut app = App::new();
        app.insert_resource(PathPlayback::repeating(path, 2, 1_000));
        app.add_plugins(TwoLinkSimPlugin);
        app.finish();
        app.cleanup();

        for _ in 0..5 {
            app.update();
        }

        let stats = app.world().resource::<TrackingStats>();
        assert_eq!(stats.frames_played, 4);
        assert_eq!(stats.frames_solved, 2);
        assert_eq!(stats.frames_skipped, 2);

        let frames: Vec<u64> = app
            .world()
            .resource::<AngleHistory>()
            .samples()
            .iter()
            .map(|s| s.frame)
            .collect();
        assert_eq!(frames, vec![0, 2]);
    }
}
