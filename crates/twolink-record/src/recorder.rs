//! MCAP-backed tracking recorder resources and Bevy systems.
//!
//! # Architecture
//!
//! [`RecordingConfig`] is inserted as a Bevy [`Resource`] before the app
//! starts.  [`Recorder`] is inserted by [`RecorderPlugin`] on startup as a
//! **non-send resource** (because `mcap::Writer` is not `Send`).
//! The recording systems run in [`PostUpdate`] and append one frame per
//! solved animation frame to the open MCAP file.  Skipped frames write
//! nothing.
//!
//! | Topic     | Payload type    | Encoding           |
//! |-----------|-----------------|--------------------|
//! | `/angles` | [`AngleFrame`]  | `application/json` |
//! | `/pose`   | [`PoseFrame`]   | `application/json` |
//!
//! [`RecorderPlugin`]: crate::plugin::RecorderPlugin

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use mcap::records::MessageHeader;
use mcap::write::Writer as McapWriter;

use twolink_core::time::SimTime;
use twolink_ik::ArmState;
use twolink_sim::PathPlayback;

use crate::types::{AngleFrame, PoseFrame};

/// Topic carrying [`AngleFrame`] messages.
pub const ANGLES_TOPIC: &str = "/angles";
/// Topic carrying [`PoseFrame`] messages.
pub const POSE_TOPIC: &str = "/pose";

// ---------------------------------------------------------------------------
// RecordingConfig
// ---------------------------------------------------------------------------

/// Configuration resource that controls what gets recorded and where.
///
/// Insert this resource before the app starts.  If it is absent the
/// [`RecorderPlugin`](crate::plugin::RecorderPlugin) uses the defaults and
/// writes to `tracking.mcap` in the current directory.
#[derive(Resource, Clone, Debug)]
pub struct RecordingConfig {
    /// Path for the output MCAP file.
    pub output_path: PathBuf,
    /// Whether to record joint angles (`/angles` channel).
    pub record_angles: bool,
    /// Whether to record arm poses (`/pose` channel).
    pub record_pose: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("tracking.mcap"),
            record_angles: true,
            record_pose: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelIds
// ---------------------------------------------------------------------------

/// Resource storing the registered MCAP channel IDs.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChannelIds {
    pub angles: Option<u16>,
    pub pose: Option<u16>,
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Non-send Bevy resource wrapping the open MCAP writer.
///
/// Registered as a **non-send resource** because `mcap::Writer` is not `Send`.
/// Recording systems must use [`NonSendMut<Recorder>`] to access it.
pub struct Recorder {
    writer: Option<McapWriter<BufWriter<File>>>,
    schema_id: Option<u16>,
    sequence: u32,
    messages: u64,
}

impl Recorder {
    /// Open a new MCAP file at the given path and return a ready Recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the MCAP header
    /// cannot be written.
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::create(path)?;
        let buf = BufWriter::new(file);
        let writer = McapWriter::new(buf)?;
        Ok(Self {
            writer: Some(writer),
            schema_id: None,
            sequence: 0,
            messages: 0,
        })
    }

    /// Add a channel for the given topic using JSON encoding.
    ///
    /// The shared JSON schema is registered on first use; schema data is
    /// optional for JSON so it is left empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer was already finished or the schema or
    /// channel record cannot be written.
    pub fn add_json_channel(&mut self, topic: &str) -> Result<u16, Box<dyn std::error::Error>> {
        let writer = self.writer.as_mut().ok_or("recorder already finished")?;
        let schema_id = match self.schema_id {
            Some(id) => id,
            None => {
                let id = writer.add_schema("json", "jsonschema", &[])?;
                self.schema_id = Some(id);
                id
            }
        };
        let channel_id =
            writer.add_channel(schema_id, topic, "application/json", &BTreeMap::new())?;
        Ok(channel_id)
    }

    /// Write a raw JSON payload to a known channel.
    fn write_json(
        &mut self,
        channel_id: u16,
        timestamp_ns: u64,
        payload: &[u8],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        if let Some(ref mut w) = self.writer {
            w.write_to_known_channel(
                &MessageHeader {
                    channel_id,
                    sequence: seq,
                    log_time: timestamp_ns,
                    publish_time: timestamp_ns,
                },
                payload,
            )?;
            self.messages += 1;
        }
        Ok(())
    }

    /// Serialize and write an [`AngleFrame`] to the given channel.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the MCAP write fails.
    pub fn write_angle_frame(
        &mut self,
        channel_id: u16,
        frame: &AngleFrame,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let payload = serde_json::to_vec(frame)?;
        self.write_json(channel_id, frame.timestamp_ns, &payload)
    }

    /// Serialize and write a [`PoseFrame`] to the given channel.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the MCAP write fails.
    pub fn write_pose_frame(
        &mut self,
        channel_id: u16,
        frame: &PoseFrame,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let payload = serde_json::to_vec(frame)?;
        self.write_json(channel_id, frame.timestamp_ns, &payload)
    }

    /// Number of messages written so far.
    pub const fn message_count(&self) -> u64 {
        self.messages
    }

    /// Whether [`finish`](Self::finish) has already run.
    pub const fn is_finished(&self) -> bool {
        self.writer.is_none()
    }

    /// Finalize the MCAP file.  Must be called before drop for a valid file.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCAP footer cannot be written.
    pub fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mut w) = self.writer.take() {
            w.finish()?;
        }
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        // Best-effort finish; errors are silently ignored on drop.
        let _ = self.finish();
    }
}

// ---------------------------------------------------------------------------
// Startup system: open the file and register channels
// ---------------------------------------------------------------------------

/// Startup system that opens the MCAP file and registers its channels.
///
/// On failure the error is logged and no recorder is inserted; the
/// recording systems then do nothing and the frame loop carries on.
pub fn setup_recorder(world: &mut World) {
    let config = world
        .get_resource::<RecordingConfig>()
        .cloned()
        .unwrap_or_default();

    let mut recorder = match Recorder::open(&config.output_path) {
        Ok(r) => r,
        Err(e) => {
            error!(
                "twolink-record: failed to open MCAP file {}: {e}",
                config.output_path.display()
            );
            return;
        }
    };

    let mut channel_ids = ChannelIds::default();
    for (enabled, topic, slot) in [
        (config.record_angles, ANGLES_TOPIC, &mut channel_ids.angles),
        (config.record_pose, POSE_TOPIC, &mut channel_ids.pose),
    ] {
        if !enabled {
            continue;
        }
        match recorder.add_json_channel(topic) {
            Ok(id) => *slot = Some(id),
            Err(e) => error!("twolink-record: failed to add {topic} channel: {e}"),
        }
    }

    debug!(
        "twolink-record: recording to {}",
        config.output_path.display()
    );
    world.insert_non_send_resource(recorder);
    world.insert_resource(channel_ids);
}

/// Finalize and remove the recorder from `world`.
///
/// Returns the number of messages written, or `None` if no recorder was
/// running.
///
/// # Errors
///
/// Returns an error if the MCAP footer cannot be written.
pub fn finish_recording(world: &mut World) -> Result<Option<u64>, Box<dyn std::error::Error>> {
    let Some(mut recorder) = world.remove_non_send_resource::<Recorder>() else {
        return Ok(None);
    };
    recorder.finish()?;
    Ok(Some(recorder.message_count()))
}

// ---------------------------------------------------------------------------
// Recording systems
// ---------------------------------------------------------------------------

/// `PostUpdate` system: writes an [`AngleFrame`] for a freshly solved frame.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn record_angles_system(
    recorder: Option<NonSendMut<Recorder>>,
    channel_ids: Option<Res<ChannelIds>>,
    sim_time: Res<SimTime>,
    playback: Res<PathPlayback>,
    state: Res<ArmState>,
) {
    let Some(channel_id) = channel_ids.and_then(|ids| ids.angles) else {
        return;
    };
    let Some(mut recorder) = recorder else {
        return;
    };
    if !state.solved_this_frame() {
        return;
    }
    let (Some(current), Some(angles)) = (playback.current(), state.angles) else {
        return;
    };

    let frame = AngleFrame::new(sim_time.nanos(), current.frame, current.path_index, angles);
    if let Err(e) = recorder.write_angle_frame(channel_id, &frame) {
        error!("twolink-record: failed to write angle frame: {e}");
    }
}

/// `PostUpdate` system: writes a [`PoseFrame`] for a freshly solved frame.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn record_pose_system(
    recorder: Option<NonSendMut<Recorder>>,
    channel_ids: Option<Res<ChannelIds>>,
    sim_time: Res<SimTime>,
    state: Res<ArmState>,
) {
    let Some(channel_id) = channel_ids.and_then(|ids| ids.pose) else {
        return;
    };
    let Some(mut recorder) = recorder else {
        return;
    };
    if !state.solved_this_frame() {
        return;
    }
    let (Some(pose), Some(target)) = (state.pose, state.target) else {
        return;
    };

    let frame = PoseFrame::new(sim_time.nanos(), &pose, target);
    let error = frame.tracking_error();
    if error > 1e-6 {
        warn!("twolink-record: effector misses target {target} by {error:.3e} mm");
    }
    if let Err(e) = recorder.write_pose_frame(channel_id, &frame) {
        error!("twolink-record: failed to write pose frame: {e}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use twolink_core::JointAngles;

    use super::*;

    fn read_topics(path: &Path) -> Vec<(String, u64, Vec<u8>)> {
        let bytes = std::fs::read(path).unwrap();
        mcap::MessageStream::new(&bytes)
            .unwrap()
            .map(|m| {
                let m = m.unwrap();
                (m.channel.topic.clone(), m.log_time, m.data.into_owned())
            })
            .collect()
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.mcap");
        assert!(Recorder::open(&path).is_err());
    }

    #[test]
    fn written_frames_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angles.mcap");

        let mut recorder = Recorder::open(&path).unwrap();
        let angles_id = recorder.add_json_channel(ANGLES_TOPIC).unwrap();
        let frame = AngleFrame::new(100_000_000, 1, 4, JointAngles::new(0.5, 1.25));
        recorder.write_angle_frame(angles_id, &frame).unwrap();
        recorder.write_angle_frame(angles_id, &frame).unwrap();
        assert_eq!(recorder.message_count(), 2);
        recorder.finish().unwrap();
        assert!(recorder.is_finished());

        let messages = read_topics(&path);
        assert_eq!(messages.len(), 2);
        let (topic, log_time, data) = &messages[0];
        assert_eq!(topic, ANGLES_TOPIC);
        assert_eq!(*log_time, 100_000_000);
        let decoded: AngleFrame = serde_json::from_slice(data).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn channels_share_one_schema() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::open(&dir.path().join("c.mcap")).unwrap();
        let a = recorder.add_json_channel(ANGLES_TOPIC).unwrap();
        let b = recorder.add_json_channel(POSE_TOPIC).unwrap();
        assert_ne!(a, b);
        assert!(recorder.schema_id.is_some());
    }

    #[test]
    fn finished_recorder_rejects_channels() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::open(&dir.path().join("f.mcap")).unwrap();
        recorder.finish().unwrap();
        assert!(recorder.add_json_channel(ANGLES_TOPIC).is_err());
        // Finishing twice is a no-op.
        assert!(recorder.finish().is_ok());
    }

    #[test]
    fn finish_recording_without_recorder() {
        let mut world = World::new();
        assert!(finish_recording(&mut world).unwrap().is_none());
    }
}
