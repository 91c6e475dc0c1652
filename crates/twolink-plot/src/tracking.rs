//! The tracking figure: target line, path, reach annulus and arm pose.
//!
//! Drawn in millimetres with the shoulder at the origin. SVG has Y pointing
//! down, so every Y coordinate is negated at render time.

use nalgebra::Point2;
use svg::Document;
use svg::node::element::Group;

use twolink_core::{ArmGeometry, LineEquation, TargetPath};
use twolink_ik::{ArmPose, forward_kinematics};
use twolink_sim::AngleHistory;

use crate::draw::{dot, fmt_scalar, label, polyline_d, segment, stroke};

const LINK1_COLOR: &str = "blue";
const LINK2_COLOR: &str = "green";
const EFFECTOR_COLOR: &str = "red";
const TARGET_COLOR: &str = "red";
const FONT_SIZE: f64 = 5.0;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Visible region of the tracking figure, in millimetres (Y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Frame an arm of the given geometry with a 10 mm border.
    ///
    /// The view is square, spans the full reach horizontally and is shifted
    /// up by half a reach, so the default 50/40 mm arm gets
    /// `[-100, 100] x [-50, 150]`.
    #[must_use]
    pub fn for_geometry(geometry: &ArmGeometry) -> Self {
        let half = geometry.max_reach() + 10.0;
        Self {
            x_min: -half,
            x_max: half,
            y_min: -half / 2.0,
            y_max: 1.5 * half,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// `viewBox` attribute with Y flipped.
    fn view_box(&self) -> String {
        format!(
            "{} {} {} {}",
            fmt_scalar(self.x_min),
            fmt_scalar(-self.y_max),
            fmt_scalar(self.width()),
            fmt_scalar(self.height()),
        )
    }
}

// ---------------------------------------------------------------------------
// TrackingFigure
// ---------------------------------------------------------------------------

/// Everything drawn in the tracking figure.
#[derive(Debug, Clone)]
pub struct TrackingFigure<'a> {
    pub geometry: ArmGeometry,
    pub line: LineEquation,
    /// X range over which the target line is drawn.
    pub line_range: (f64, f64),
    pub path: &'a TargetPath,
    /// End-effector positions of the solved frames, in order.
    pub trail: Vec<(f64, f64)>,
    /// Pose drawn as the arm; usually the last solved frame.
    pub pose: Option<ArmPose>,
    pub viewport: Viewport,
}

impl<'a> TrackingFigure<'a> {
    /// Figure with no trail and no arm drawn.
    #[must_use]
    pub fn new(
        geometry: ArmGeometry,
        line: LineEquation,
        line_range: (f64, f64),
        path: &'a TargetPath,
    ) -> Self {
        Self {
            geometry,
            line,
            line_range,
            path,
            trail: Vec::new(),
            pose: None,
            viewport: Viewport::for_geometry(&geometry),
        }
    }

    /// Add the effector trail and final pose replayed from `history`.
    #[must_use]
    pub fn with_history(mut self, history: &AngleHistory) -> Self {
        let poses: Vec<ArmPose> = history
            .samples()
            .iter()
            .map(|s| forward_kinematics(&self.geometry, s.angles))
            .collect();
        self.trail = poses.iter().map(|p| (p.effector.x, p.effector.y)).collect();
        self.pose = poses.last().copied();
        self
    }

    /// Render the figure to an SVG [`Document`].
    #[must_use]
    pub fn render(&self) -> Document {
        let vp = &self.viewport;
        let doc = Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("viewBox", vp.view_box())
            .set("width", format!("{}mm", fmt_scalar(vp.width())))
            .set("height", format!("{}mm", fmt_scalar(vp.height())));

        doc.add(self.axes())
            .add(self.reach())
            .add(self.target_line())
            .add(self.path_points())
            .add(self.trail())
            .add(self.arm())
            .add(self.legend())
    }

    fn axes(&self) -> Group {
        let vp = &self.viewport;
        let grey = "#999999";
        Group::new()
            .set("id", "axes")
            .add(segment((vp.x_min, 0.0), (vp.x_max, 0.0), grey, 0.3))
            .add(segment((0.0, -vp.y_min), (0.0, -vp.y_max), grey, 0.3))
            .add(label(
                "2-Link Manipulator Tracking a Straight Line",
                (vp.x_min + vp.width() / 2.0, -vp.y_max + 8.0),
                FONT_SIZE,
                "middle",
            ))
            .add(label(
                "X (mm)",
                (vp.x_max - 2.0, -2.0),
                FONT_SIZE * 0.8,
                "end",
            ))
            .add(label(
                "Y (mm)",
                (2.0, -vp.y_max + 16.0),
                FONT_SIZE * 0.8,
                "start",
            ))
    }

    fn reach(&self) -> Group {
        let ring = |r: f64| {
            svg::node::element::Circle::new()
                .set("cx", 0)
                .set("cy", 0)
                .set("r", fmt_scalar(r))
                .set("fill", "none")
                .set("stroke", "#cccccc")
                .set("stroke-width", 0.4)
                .set("stroke-dasharray", "2,2")
        };
        let mut group = Group::new()
            .set("id", "reach")
            .add(ring(self.geometry.max_reach()));
        if self.geometry.min_reach() > 0.0 {
            group = group.add(ring(self.geometry.min_reach()));
        }
        group
    }

    fn target_line(&self) -> Group {
        let (x0, x1) = self.line_range;
        let from = (x0, -self.line.y_at(x0));
        let to = (x1, -self.line.y_at(x1));
        Group::new().set("id", "target-line").add(
            segment(from, to, TARGET_COLOR, 0.6).set("stroke-dasharray", "4,2"),
        )
    }

    fn path_points(&self) -> Group {
        self.path
            .iter()
            .fold(Group::new().set("id", "path"), |g, p| {
                g.add(dot((p.x, -p.y), 0.6, "#555555"))
            })
    }

    fn trail(&self) -> Group {
        let group = Group::new().set("id", "trail");
        if self.trail.len() < 2 {
            return group;
        }
        let points: Vec<(f64, f64)> = self.trail.iter().map(|&(x, y)| (x, -y)).collect();
        group.add(stroke(polyline_d(&points, &[]), "orange", 0.5))
    }

    fn arm(&self) -> Group {
        let group = Group::new().set("id", "arm");
        let Some(pose) = self.pose else {
            return group;
        };
        let flip = |p: Point2<f64>| (p.x, -p.y);
        let [(shoulder, elbow), (_, effector)] = pose.segments().map(|(a, b)| (flip(a), flip(b)));
        group
            .add(segment(shoulder, elbow, LINK1_COLOR, 4.0).set("id", "link1"))
            .add(segment(elbow, effector, LINK2_COLOR, 4.0).set("id", "link2"))
            .add(dot(shoulder, 2.5, LINK1_COLOR))
            .add(dot(elbow, 2.5, LINK2_COLOR))
            .add(dot(effector, 2.0, EFFECTOR_COLOR).set("id", "end-effector"))
    }

    fn legend(&self) -> Group {
        let vp = &self.viewport;
        let entries = [
            (format!("Target Line ({})", self.line), TARGET_COLOR),
            ("Link 1".to_owned(), LINK1_COLOR),
            ("Link 2".to_owned(), LINK2_COLOR),
            ("End Effector".to_owned(), EFFECTOR_COLOR),
        ];
        let x = vp.x_min + 4.0;
        let top = -vp.y_max + 16.0;
        entries
            .iter()
            .enumerate()
            .fold(Group::new().set("id", "legend"), |g, (i, (text, color))| {
                #[allow(clippy::cast_precision_loss)]
                let y = (i as f64).mul_add(FONT_SIZE * 1.4, top);
                g.add(segment((x, y - 1.5), (x + 6.0, y - 1.5), color, 1.5))
                    .add(label(text, (x + 8.0, y), FONT_SIZE * 0.8, "start"))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use twolink_core::{JointAngles, TargetPoint};
    use twolink_sim::AngleSample;

    use super::*;

    fn path() -> TargetPath {
        TargetPath::new(vec![
            TargetPoint::new(-10.0, 15.0),
            TargetPoint::new(0.0, 10.0),
            TargetPoint::new(10.0, 5.0),
        ])
    }

    fn figure(path: &TargetPath) -> TrackingFigure<'_> {
        TrackingFigure::new(
            ArmGeometry::default(),
            LineEquation::default(),
            (-90.0, 90.0),
            path,
        )
    }

    #[test]
    fn default_viewport() {
        let vp = Viewport::for_geometry(&ArmGeometry::default());
        assert_eq!(
            vp,
            Viewport {
                x_min: -100.0,
                x_max: 100.0,
                y_min: -50.0,
                y_max: 150.0,
            }
        );
        assert_eq!(vp.view_box(), "-100 -150 200 200");
    }

    #[test]
    fn renders_title_and_line_label() {
        let path = path();
        let svg = figure(&path).render().to_string();
        assert!(svg.contains("2-Link Manipulator Tracking a Straight Line"));
        assert!(svg.contains("Target Line (y = -0.5x + 10)"));
        assert!(svg.contains("viewBox=\"-100 -150 200 200\""));
    }

    #[test]
    fn target_line_spans_range_with_y_flipped() {
        let path = path();
        let svg = figure(&path).target_line().to_string();
        // y(-90) = 55, y(90) = -35; both negated.
        assert!(svg.contains("x1=\"-90\""));
        assert!(svg.contains("y1=\"-55\""));
        assert!(svg.contains("x2=\"90\""));
        assert!(svg.contains("y2=\"35\""));
    }

    #[test]
    fn one_dot_per_path_point() {
        let path = path();
        let svg = figure(&path).path_points().to_string();
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn both_reach_circles_for_unequal_segments() {
        let path = path();
        let svg = figure(&path).reach().to_string();
        assert!(svg.contains("r=\"90\""));
        assert!(svg.contains("r=\"10\""));
    }

    #[test]
    fn no_arm_without_pose() {
        let path = path();
        let svg = figure(&path).render().to_string();
        assert!(!svg.contains("id=\"link1\""));
    }

    #[test]
    fn arm_drawn_from_pose() {
        let path = path();
        let pose = ArmPose {
            elbow: Point2::new(50.0, 0.0),
            effector: Point2::new(50.0, 40.0),
        };
        let fig = TrackingFigure {
            pose: Some(pose),
            ..figure(&path)
        };
        let svg = fig.render().to_string();
        assert!(svg.contains("id=\"link1\""));
        assert!(svg.contains("id=\"link2\""));
        assert!(svg.contains("id=\"end-effector\""));
        assert!(svg.contains("cy=\"-40\""));
    }

    #[test]
    fn history_gives_trail_and_last_pose() {
        let path = path();
        let mut history = AngleHistory::new();
        for (frame, theta1) in [(0_u64, 0.0), (1, 0.5), (2, 1.0)] {
            history.push(AngleSample {
                frame,
                path_index: 0,
                time_ns: 0,
                angles: JointAngles::new(theta1, 0.0),
            });
        }
        let fig = figure(&path).with_history(&history);
        assert_eq!(fig.trail.len(), 3);
        let pose = fig.pose.unwrap();
        assert!((pose.effector.x - 90.0 * 1.0_f64.cos()).abs() < 1e-9);
        assert!(fig.trail().to_string().contains("<path"));
    }
}
