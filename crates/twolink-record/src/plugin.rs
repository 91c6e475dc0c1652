//! [`RecorderPlugin`]: registers the recording systems with the Bevy app.

use bevy::prelude::*;

use crate::recorder::{RecordingConfig, record_angles_system, record_pose_system, setup_recorder};

// ---------------------------------------------------------------------------
// RecorderPlugin
// ---------------------------------------------------------------------------

/// Bevy plugin that sets up MCAP recording of a tracking run.
///
/// # Usage
///
/// ```no_run
/// use bevy::prelude::*;
/// use twolink_record::plugin::RecorderPlugin;
/// use twolink_record::recorder::RecordingConfig;
///
/// let mut app = App::new();
/// app.insert_resource(RecordingConfig::default());
/// app.add_plugins(RecorderPlugin);
/// ```
///
/// The recording systems read [`ArmState`](twolink_ik::ArmState) and
/// [`PathPlayback`](twolink_sim::PathPlayback) in `PostUpdate`, after the
/// frame's solve has run in `Update`.
pub struct RecorderPlugin;

impl Plugin for RecorderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RecordingConfig>();

        // setup_recorder takes &mut World (exclusive system), so it runs in
        // Startup and registers the channels before the first frame.
        app.add_systems(Startup, setup_recorder);

        // Both systems take NonSendMut<Recorder> and therefore run on the
        // main thread.
        app.add_systems(PostUpdate, (record_angles_system, record_pose_system).chain());
    }
}
