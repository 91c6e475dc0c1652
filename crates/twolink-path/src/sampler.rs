//! Sampling of the target line into a reachable path.
//!
//! The scan walks `x_i = x_min + i * step` for `i = 0..scan_count()`. Each
//! x is computed from its index rather than by repeated addition, so the
//! number of scanned points and their values are reproducible bit for bit.

use twolink_core::config::PathConfig;
use twolink_core::{ArmGeometry, ConfigError, LineEquation, TargetPath, TargetPoint};

/// Slack (in steps) allowed when deciding whether `x_max` is on the grid.
const SCAN_TOLERANCE: f64 = 1e-9;

/// Upper bound on scanned points; larger scans indicate a bad step.
pub const MAX_SCAN_POINTS: usize = 10_000_000;

/// Generates the ordered list of target points the arm will track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSampler {
    geometry: ArmGeometry,
    line: LineEquation,
    x_min: f64,
    x_max: f64,
    step: f64,
    scan_count: usize,
}

impl PathSampler {
    /// Build a sampler for `geometry` from a validated [`PathConfig`].
    ///
    /// # Errors
    ///
    /// Fails on a non-positive step, an inverted or non-finite scan range,
    /// a non-finite line, or a scan of more than [`MAX_SCAN_POINTS`].
    pub fn new(geometry: ArmGeometry, config: &PathConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let span = (config.x_max - config.x_min) / config.step;
        if !(span + 1.0 < MAX_SCAN_POINTS as f64) {
            return Err(ConfigError::InvalidValue {
                field: "step".into(),
                message: format!(
                    "scan of [{}, {}] by {} exceeds {MAX_SCAN_POINTS} points",
                    config.x_min, config.x_max, config.step
                ),
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scan_count = (span + SCAN_TOLERANCE).floor() as usize + 1;

        Ok(Self {
            geometry,
            line: config.line,
            x_min: config.x_min,
            x_max: config.x_max,
            step: config.step,
            scan_count,
        })
    }

    /// Number of x values visited by the scan, before filtering.
    #[must_use]
    pub const fn scan_count(&self) -> usize {
        self.scan_count
    }

    /// The line being sampled.
    #[must_use]
    pub const fn line(&self) -> &LineEquation {
        &self.line
    }

    #[must_use]
    pub const fn geometry(&self) -> &ArmGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// The `index`-th scanned x value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scan_x(&self, index: usize) -> f64 {
        (index as f64).mul_add(self.step, self.x_min).min(self.x_max)
    }

    /// All scanned points, reachable or not, in scan order.
    pub fn scan(&self) -> impl Iterator<Item = TargetPoint> + '_ {
        (0..self.scan_count).map(|i| {
            let x = self.scan_x(i);
            TargetPoint::new(x, self.line.y_at(x))
        })
    }

    /// Points of the scan within `max_reach` of the shoulder, in scan order.
    ///
    /// Only the outer radius is filtered: points inside `min_reach` stay in
    /// the path and are skipped by the consumer when the solver rejects them.
    #[must_use]
    pub fn generate(&self) -> TargetPath {
        let max_reach = self.geometry.max_reach();
        self.scan()
            .filter(|p| p.norm() <= max_reach)
            .collect::<Vec<_>>()
            .into()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
