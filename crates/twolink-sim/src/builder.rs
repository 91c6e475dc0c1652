//! Scene builder for constructing a fully configured Bevy [`App`].
//!
//! [`SceneBuilder`] validates a [`TwoLinkConfig`], samples the target path,
//! and wires the solver, playback and stats into one app.
//!
//! # Example
//!
//! ```no_run
//! use twolink_sim::SceneBuilder;
//!
//! let mut scene = SceneBuilder::new().with_frames(50).build().unwrap();
//! scene.run();
//! ```

use bevy::app::PluginsState;
use bevy::prelude::*;
use twolink_core::config::TwoLinkConfig;
use twolink_core::{ConfigError, TargetPath};
use twolink_ik::{IkSolver, KinematicsSolver};
use twolink_path::PathSampler;

use crate::TwoLinkSimPlugin;
use crate::playback::PathPlayback;
use crate::stats::{AngleHistory, TrackingStats};

// ---------------------------------------------------------------------------
// SpawnedScene
// ---------------------------------------------------------------------------

/// Result of building a scene: the Bevy app plus the path it plays.
///
/// Plugin setup is finalized on the first [`step`](Self::step) or
/// [`run`](Self::run), so extra plugins (recording, logging) can still be
/// added to `app` after building.
pub struct SpawnedScene {
    /// The fully configured Bevy application.
    pub app: App,
    /// Target path generated from the configuration.
    pub path: TargetPath,
    /// Number of x values scanned to produce `path`.
    pub scanned: usize,
}

impl SpawnedScene {
    /// Whether playback has played every frame.
    pub fn is_finished(&self) -> bool {
        self.app.world().resource::<PathPlayback>().is_finished()
    }

    /// Finalize plugin setup if it has not been done yet.
    pub fn finish_setup(&mut self) {
        if !matches!(self.app.plugins_state(), PluginsState::Cleaned) {
            self.app.finish();
            self.app.cleanup();
        }
    }

    /// Run one frame.
    pub fn step(&mut self) {
        self.finish_setup();
        self.app.update();
    }

    /// Run frames until playback finishes. Returns the number of updates.
    pub fn run(&mut self) -> u64 {
        self.finish_setup();
        let mut updates = 0;
        while !self.is_finished() {
            self.app.update();
            updates += 1;
        }
        updates
    }

    pub fn stats(&self) -> &TrackingStats {
        self.app.world().resource::<TrackingStats>()
    }

    pub fn history(&self) -> &AngleHistory {
        self.app.world().resource::<AngleHistory>()
    }
}

// ---------------------------------------------------------------------------
// SceneBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a complete tracking run.
pub struct SceneBuilder {
    config: TwoLinkConfig,
    frames: Option<u64>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// Create a new scene builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TwoLinkConfig::default(),
            frames: None,
        }
    }

    /// Set the run configuration.
    #[must_use]
    pub fn with_config(mut self, config: TwoLinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Play exactly `frames` frames instead of `path.len() * repeat`.
    #[must_use]
    pub const fn with_frames(mut self, frames: u64) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Build the Bevy [`App`] with all plugins and resources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn build(self) -> Result<SpawnedScene, ConfigError> {
        self.config.validate()?;
        let geometry = self.config.geometry()?;
        let sampler = PathSampler::new(geometry, &self.config.path)?;
        let path = sampler.generate();
        let scanned = sampler.scan_count();

        let interval = self.config.animation.frame_interval_nanos();
        let playback = match self.frames {
            Some(frames) => PathPlayback::new(path.clone(), frames, interval),
            None => PathPlayback::repeating(path.clone(), self.config.animation.repeat, interval),
        };

        info!(
            "twolink-sim: {} of {} scanned points within reach of {}, {} frames",
            path.len(),
            scanned,
            geometry.max_reach(),
            playback.total_frames(),
        );
        if path.is_empty() {
            warn!("twolink-sim: path is empty, nothing to play");
        }

        let mut app = App::new();
        app.insert_resource(IkSolver(KinematicsSolver::new(geometry)))
            .insert_resource(playback)
            .insert_resource(self.config)
            .add_plugins(TwoLinkSimPlugin);

        Ok(SpawnedScene {
            app,
            path,
            scanned,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
