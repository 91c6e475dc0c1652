//! Frame-by-frame playback of a target path.
//!
//! [`PathPlayback`] owns the generated [`TargetPath`] and a frame counter.
//! Each frame, [`advance_playback_system`] picks `path[frame % len]` as the
//! IK goal and advances [`SimTime`] by the frame interval, looping over the
//! path until the configured number of frames has been played.

use bevy::prelude::*;

use twolink_core::time::SimTime;
use twolink_core::{TargetPath, TargetPoint};
use twolink_ik::IkGoal;

/// Frame currently being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackFrame {
    /// Zero-based frame number since the start of playback.
    pub frame: u64,
    /// Index into the path of this frame's target.
    pub path_index: usize,
}

/// Resource driving the path playback.
#[derive(Resource, Debug, Clone, Default)]
pub struct PathPlayback {
    path: TargetPath,
    frames_played: u64,
    total_frames: u64,
    frame_interval_nanos: u64,
    current: Option<PlaybackFrame>,
}

impl PathPlayback {
    /// Play `total_frames` frames over `path`, looping as needed.
    #[must_use]
    pub const fn new(path: TargetPath, total_frames: u64, frame_interval_nanos: u64) -> Self {
        Self {
            path,
            frames_played: 0,
            total_frames,
            frame_interval_nanos,
            current: None,
        }
    }

    /// Play the whole path `repeat` times.
    #[must_use]
    pub fn repeating(path: TargetPath, repeat: u32, frame_interval_nanos: u64) -> Self {
        let total_frames = path.len() as u64 * u64::from(repeat);
        Self::new(path, total_frames, frame_interval_nanos)
    }

    pub const fn path(&self) -> &TargetPath {
        &self.path
    }

    pub const fn frames_played(&self) -> u64 {
        self.frames_played
    }

    pub const fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub const fn frame_interval_nanos(&self) -> u64 {
        self.frame_interval_nanos
    }

    /// Frame played by the most recent update, if any.
    pub const fn current(&self) -> Option<PlaybackFrame> {
        self.current
    }

    /// `true` once every frame has been played (or the path is empty).
    pub const fn is_finished(&self) -> bool {
        self.path.is_empty() || self.frames_played >= self.total_frames
    }

    /// Take the next frame, returning its target. `None` when finished.
    pub fn next_frame(&mut self) -> Option<TargetPoint> {
        if self.is_finished() {
            self.current = None;
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let path_index = (self.frames_played % self.path.len() as u64) as usize;
        self.current = Some(PlaybackFrame {
            frame: self.frames_played,
            path_index,
        });
        self.frames_played += 1;
        self.path.get(path_index)
    }
}

/// System that feeds the next path point to the IK solver.
///
/// Frame `k` is stamped at `k * frame_interval`: the clock advances before
/// every frame except the first.
pub fn advance_playback_system(
    mut playback: ResMut<PathPlayback>,
    mut goal: ResMut<IkGoal>,
    mut time: ResMut<SimTime>,
) {
    let started = playback.frames_played() > 0;
    goal.0 = playback.next_frame();
    if goal.0.is_some() && started {
        time.advance(playback.frame_interval_nanos());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
