use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// ArmGeometry
// ---------------------------------------------------------------------------

/// Segment lengths of the two-link arm, in millimetres.
///
/// Both lengths are finite and strictly positive. The reachable workspace is
/// the closed annulus `min_reach() <= |p| <= max_reach()` around the shoulder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmGeometry {
    segment1_length: f64,
    segment2_length: f64,
}

impl ArmGeometry {
    /// Default upper-arm length (mm).
    pub const DEFAULT_SEGMENT1: f64 = 50.0;
    /// Default forearm length (mm).
    pub const DEFAULT_SEGMENT2: f64 = 40.0;
    /// Rounding allowance applied to both annulus radii, in ulps of `max_reach`.
    pub const REACH_SLACK_ULPS: f64 = 16.0;

    /// Create a geometry, rejecting non-positive or non-finite lengths.
    pub fn new(segment1_length: f64, segment2_length: f64) -> Result<Self, ConfigError> {
        check_length("segment1_length", segment1_length)?;
        check_length("segment2_length", segment2_length)?;
        Ok(Self {
            segment1_length,
            segment2_length,
        })
    }

    /// Length of the first (shoulder to elbow) segment.
    #[must_use]
    pub const fn segment1_length(&self) -> f64 {
        self.segment1_length
    }

    /// Length of the second (elbow to end-effector) segment.
    #[must_use]
    pub const fn segment2_length(&self) -> f64 {
        self.segment2_length
    }

    /// Outer radius of the reachable annulus.
    #[must_use]
    pub fn max_reach(&self) -> f64 {
        self.segment1_length + self.segment2_length
    }

    /// Inner radius of the reachable annulus.
    #[must_use]
    pub fn min_reach(&self) -> f64 {
        (self.segment1_length - self.segment2_length).abs()
    }

    /// Whether `point` lies inside the closed reachable annulus.
    ///
    /// Both radii are widened by [`REACH_SLACK_ULPS`](Self::REACH_SLACK_ULPS)
    /// units of `max_reach` rounding, so fully stretched or folded poses
    /// computed by forward kinematics still count as reachable.
    #[must_use]
    pub fn contains(&self, point: TargetPoint) -> bool {
        let d = point.norm();
        let slack = self.reach_slack();
        d.is_finite() && d >= self.min_reach() - slack && d <= self.max_reach() + slack
    }

    fn reach_slack(&self) -> f64 {
        Self::REACH_SLACK_ULPS * f64::EPSILON * self.max_reach()
    }
}

impl Default for ArmGeometry {
    fn default() -> Self {
        Self {
            segment1_length: Self::DEFAULT_SEGMENT1,
            segment2_length: Self::DEFAULT_SEGMENT2,
        }
    }
}

fn check_length(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSegmentLength { name, value })
    }
}

// ---------------------------------------------------------------------------
// TargetPoint
// ---------------------------------------------------------------------------

/// Desired end-effector position in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetPoint {
    pub x: f64,
    pub y: f64,
}

impl TargetPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from the shoulder joint (the origin).
    ///
    /// Computed as `sqrt(x² + y²)` so that points with an exactly
    /// representable distance compare exactly against the reach limits.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.x.mul_add(self.x, self.y * self.y).sqrt()
    }
}

impl From<(f64, f64)> for TargetPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for TargetPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// JointAngles
// ---------------------------------------------------------------------------

/// Joint configuration of the arm, in radians.
///
/// `theta1` is the shoulder angle measured from the +x axis; `theta2` is the
/// elbow angle measured from the direction of segment 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub theta1: f64,
    pub theta2: f64,
}

impl JointAngles {
    #[must_use]
    pub const fn new(theta1: f64, theta2: f64) -> Self {
        Self { theta1, theta2 }
    }

    /// Both angles converted to degrees.
    #[must_use]
    pub fn to_degrees(&self) -> (f64, f64) {
        (self.theta1.to_degrees(), self.theta2.to_degrees())
    }
}

// ---------------------------------------------------------------------------
// LineEquation
// ---------------------------------------------------------------------------

const fn default_slope() -> f64 {
    -0.5
}
const fn default_intercept() -> f64 {
    10.0
}

/// Straight target line `y = slope * x + intercept` (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineEquation {
    #[serde(default = "default_slope")]
    pub slope: f64,
    #[serde(default = "default_intercept")]
    pub intercept: f64,
}

impl LineEquation {
    #[must_use]
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Evaluate the line at `x`.
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    /// Reject non-finite coefficients.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slope.is_finite() && self.intercept.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidLine {
                slope: self.slope,
                intercept: self.intercept,
            })
        }
    }
}

impl Default for LineEquation {
    fn default() -> Self {
        Self::new(default_slope(), default_intercept())
    }
}

/// Display label such as `y = -0.5x + 10`.
impl fmt::Display for LineEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = ")?;
        let has_slope = self.slope != 0.0;
        if has_slope {
            if self.slope == 1.0 {
                write!(f, "x")?;
            } else if self.slope == -1.0 {
                write!(f, "-x")?;
            } else {
                write!(f, "{}x", self.slope)?;
            }
        }
        match (has_slope, self.intercept) {
            (false, c) => write!(f, "{c}"),
            (true, c) if c == 0.0 => Ok(()),
            (true, c) if c < 0.0 => write!(f, " - {}", -c),
            (true, c) => write!(f, " + {c}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TargetPath
// ---------------------------------------------------------------------------

/// Ordered sequence of target points, traversed front to back.
///
/// Immutable once built; the order defines the animation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetPath {
    points: Vec<TargetPoint>,
}

impl TargetPath {
    #[must_use]
    pub const fn new(points: Vec<TargetPoint>) -> Self {
        Self { points }
    }

    pub const fn len(&self) -> usize {
        self.points.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[TargetPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TargetPoint> {
        self.points.iter()
    }

    pub fn get(&self, index: usize) -> Option<TargetPoint> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Option<TargetPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<TargetPoint> {
        self.points.last().copied()
    }
}

impl std::ops::Index<usize> for TargetPath {
    type Output = TargetPoint;
    fn index(&self, i: usize) -> &TargetPoint {
        &self.points[i]
    }
}

impl<'a> IntoIterator for &'a TargetPath {
    type Item = &'a TargetPoint;
    type IntoIter = std::slice::Iter<'a, TargetPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl From<Vec<TargetPoint>> for TargetPath {
    fn from(points: Vec<TargetPoint>) -> Self {
        Self::new(points)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
