//! Tracking statistics and joint-angle history.
//!
//! [`TrackingStats`] counts played, solved and skipped frames.
//! [`AngleHistory`] keeps one [`AngleSample`] per solved frame, which the
//! plotting and reporting code consumes after playback.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use twolink_core::JointAngles;
use twolink_core::time::SimTime;
use twolink_ik::{ArmState, SolveOutcome};

use crate::playback::PathPlayback;

// ---------------------------------------------------------------------------
// TrackingStats
// ---------------------------------------------------------------------------

/// Bevy resource with cumulative frame counters.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackingStats {
    /// Frames that had a target.
    pub frames_played: u64,
    /// Frames whose target was solved.
    pub frames_solved: u64,
    /// Frames whose target was unreachable and skipped.
    pub frames_skipped: u64,
}

impl TrackingStats {
    /// Create empty stats.
    pub const fn new() -> Self {
        Self {
            frames_played: 0,
            frames_solved: 0,
            frames_skipped: 0,
        }
    }

    /// Fraction of played frames that were solved.
    pub fn solve_rate(&self) -> Option<f64> {
        if self.frames_played == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.frames_solved as f64 / self.frames_played as f64)
    }
}

// ---------------------------------------------------------------------------
// AngleHistory
// ---------------------------------------------------------------------------

/// Joint angles of one solved frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    pub frame: u64,
    pub path_index: usize,
    pub time_ns: u64,
    pub angles: JointAngles,
}

/// Solved joint angles in frame order.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleHistory {
    samples: Vec<AngleSample>,
}

impl AngleHistory {
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: AngleSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[AngleSample] {
        &self.samples
    }

    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(min, max)` of `theta1` and `theta2` in radians, or `None` when empty.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.samples.first()?;
        let init = (
            (first.angles.theta1, first.angles.theta1),
            (first.angles.theta2, first.angles.theta2),
        );
        Some(self.samples.iter().fold(init, |((a0, a1), (b0, b1)), s| {
            (
                (a0.min(s.angles.theta1), a1.max(s.angles.theta1)),
                (b0.min(s.angles.theta2), b1.max(s.angles.theta2)),
            )
        }))
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// System that counts the frame's outcome and records solved angles.
#[allow(clippy::needless_pass_by_value)]
pub fn tracking_stats_system(
    playback: Res<PathPlayback>,
    state: Res<ArmState>,
    time: Res<SimTime>,
    mut stats: ResMut<TrackingStats>,
    mut history: ResMut<AngleHistory>,
) {
    match state.outcome {
        SolveOutcome::Idle => {}
        SolveOutcome::Unreachable => {
            stats.frames_played += 1;
            stats.frames_skipped += 1;
        }
        SolveOutcome::Solved => {
            stats.frames_played += 1;
            stats.frames_solved += 1;
            if let (Some(frame), Some(angles)) = (playback.current(), state.angles) {
                history.push(AngleSample {
                    frame: frame.frame,
                    path_index: frame.path_index,
                    time_ns: time.nanos(),
                    angles,
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
