use std::path::PathBuf;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ArmGeometry, LineEquation};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_segment1_length() -> f64 {
    ArmGeometry::DEFAULT_SEGMENT1
}
const fn default_segment2_length() -> f64 {
    ArmGeometry::DEFAULT_SEGMENT2
}
const fn default_x_min() -> f64 {
    -90.0
}
const fn default_x_max() -> f64 {
    90.0
}
const fn default_step() -> f64 {
    2.0
}
const fn default_frame_interval_ms() -> u64 {
    100
}
const fn default_repeat() -> u32 {
    2
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// TwoLinkConfig
// ---------------------------------------------------------------------------

/// Complete configuration for a tracking run.
///
/// The same [`ArmConfig`] feeds both the path sampler and the kinematics
/// solver so that generated paths stay consistent with what the arm can
/// reach.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Resource)]
pub struct TwoLinkConfig {
    #[serde(default)]
    pub arm: ArmConfig,
    #[serde(default)]
    pub path: PathConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl TwoLinkConfig {
    /// Validate every section. Returns the first error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arm.geometry()?;
        self.path.validate()?;
        self.animation.validate()?;
        Ok(())
    }

    /// Validated arm geometry.
    pub fn geometry(&self) -> Result<ArmGeometry, ConfigError> {
        self.arm.geometry()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// ArmConfig
// ---------------------------------------------------------------------------

/// Raw segment lengths (mm) as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    #[serde(default = "default_segment1_length")]
    pub segment1_length: f64,
    #[serde(default = "default_segment2_length")]
    pub segment2_length: f64,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            segment1_length: default_segment1_length(),
            segment2_length: default_segment2_length(),
        }
    }
}

impl ArmConfig {
    /// Build the validated [`ArmGeometry`].
    pub fn geometry(&self) -> Result<ArmGeometry, ConfigError> {
        ArmGeometry::new(self.segment1_length, self.segment2_length)
    }
}

// ---------------------------------------------------------------------------
// PathConfig
// ---------------------------------------------------------------------------

/// Line to track and how to scan it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// First scanned x value (mm).
    #[serde(default = "default_x_min")]
    pub x_min: f64,
    /// Last scanned x value (mm), inclusive.
    #[serde(default = "default_x_max")]
    pub x_max: f64,
    /// Distance between consecutive scanned x values (mm).
    #[serde(default = "default_step")]
    pub step: f64,
    /// Target line (default `y = -0.5x + 10`).
    #[serde(default)]
    pub line: LineEquation,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            x_min: default_x_min(),
            x_max: default_x_max(),
            step: default_step(),
            line: LineEquation::default(),
        }
    }
}

impl PathConfig {
    /// Validate step, scan range and line coefficients.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if !(self.x_min.is_finite() && self.x_max.is_finite() && self.x_min <= self.x_max) {
            return Err(ConfigError::InvalidScanRange {
                min: self.x_min,
                max: self.x_max,
            });
        }
        self.line.validate()
    }
}

// ---------------------------------------------------------------------------
// AnimationConfig
// ---------------------------------------------------------------------------

/// Frame pacing of the path playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Simulated time between frames in milliseconds (default: 100).
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// How many times the path is played back (default: 2).
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            repeat: default_repeat(),
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "frame_interval_ms".into(),
                message: "must be > 0".into(),
            });
        }
        if self.repeat == 0 {
            return Err(ConfigError::InvalidValue {
                field: "repeat".into(),
                message: "must be >= 1".into(),
            });
        }
        Ok(())
    }

    /// Frame interval in nanoseconds.
    #[must_use]
    pub const fn frame_interval_nanos(&self) -> u64 {
        self.frame_interval_ms.saturating_mul(1_000_000)
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where and what a run writes to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the numbered output files.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Write an MCAP recording of joint angles and poses.
    #[serde(default = "default_true")]
    pub record: bool,
    /// Write SVG tracking and angle plots.
    #[serde(default = "default_true")]
    pub plots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            record: true,
            plots: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
