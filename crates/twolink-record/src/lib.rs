//! `twolink-record`: MCAP recorder for two-link arm tracking runs.
//!
//! Add [`RecorderPlugin`](plugin::RecorderPlugin) to a tracking app and
//! insert a [`RecordingConfig`](recorder::RecordingConfig) resource to
//! enable recording. The plugin writes an MCAP file containing the
//! timestamped joint angles and arm pose of every solved frame.
//!
//! # Example
//!
//! ```no_run
//! use twolink_record::prelude::*;
//! use twolink_sim::SceneBuilder;
//!
//! let mut scene = SceneBuilder::new().build().unwrap();
//! scene.app.insert_resource(RecordingConfig {
//!     output_path: "angles_1.mcap".into(),
//!     ..RecordingConfig::default()
//! });
//! scene.app.add_plugins(RecorderPlugin);
//! scene.run();
//! finish_recording(scene.app.world_mut()).unwrap();
//! ```

pub mod plugin;
pub mod recorder;
pub mod types;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        plugin::RecorderPlugin,
        recorder::{
            ANGLES_TOPIC, ChannelIds, POSE_TOPIC, Recorder, RecordingConfig, finish_recording,
        },
        types::{AngleFrame, PoseFrame},
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
