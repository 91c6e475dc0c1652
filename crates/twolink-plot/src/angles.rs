//! Joint angles over time.
//!
//! Plots `theta1` and `theta2` in degrees against the frame number. Skipped
//! frames leave a gap in both curves.

use svg::Document;
use svg::node::element::{Group, Rectangle};

use twolink_sim::AngleHistory;

use crate::PlotError;
use crate::draw::{fmt_scalar, label, polyline_d, segment, stroke};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 48.0;
const Y_TICKS: usize = 5;

const THETA1_COLOR: &str = "blue";
const THETA2_COLOR: &str = "green";

/// Linear map from data space to the plot area, in SVG pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axes {
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Axes {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, v: f64) -> f64 {
        let (lo, hi) = self.x_range;
        (v - lo) / (hi - lo) * Self::plot_width() + MARGIN_LEFT
    }

    fn y(&self, v: f64) -> f64 {
        let (lo, hi) = self.y_range;
        (hi - v) / (hi - lo) * Self::plot_height() + MARGIN_TOP
    }
}

/// Widen a degenerate range and pad a proper one by 5% on each side.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

/// Render the angle history as a line chart.
///
/// # Errors
///
/// Returns [`PlotError::EmptyHistory`] when there are no samples.
pub fn render_angles(history: &AngleHistory) -> Result<Document, PlotError> {
    let samples = history.samples();
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(PlotError::EmptyHistory);
    };
    let ((t1_lo, t1_hi), (t2_lo, t2_hi)) = history.bounds().ok_or(PlotError::EmptyHistory)?;

    #[allow(clippy::cast_precision_loss)]
    let x_range = if last.frame > first.frame {
        (first.frame as f64, last.frame as f64)
    } else {
        (first.frame as f64 - 1.0, first.frame as f64 + 1.0)
    };
    let axes = Axes {
        x_range,
        y_range: padded(
            t1_lo.min(t2_lo).to_degrees(),
            t1_hi.max(t2_hi).to_degrees(),
        ),
    };

    // A new subpath starts after every skipped frame.
    let breaks: Vec<bool> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| i > 0 && s.frame != samples[i - 1].frame + 1)
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let curve = |angle: fn(&twolink_sim::AngleSample) -> f64| -> Vec<(f64, f64)> {
        samples
            .iter()
            .map(|s| (axes.x(s.frame as f64), axes.y(angle(s).to_degrees())))
            .collect()
    };
    let theta1 = curve(|s| s.angles.theta1);
    let theta2 = curve(|s| s.angles.theta2);

    let doc = Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("viewBox", format!("0 0 {} {}", fmt_scalar(WIDTH), fmt_scalar(HEIGHT)))
        .set("width", fmt_scalar(WIDTH))
        .set("height", fmt_scalar(HEIGHT))
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "white"),
        )
        .add(frame_and_ticks(&axes))
        .add(
            Group::new()
                .set("id", "theta1")
                .add(stroke(polyline_d(&theta1, &breaks), THETA1_COLOR, 1.5)),
        )
        .add(
            Group::new()
                .set("id", "theta2")
                .add(stroke(polyline_d(&theta2, &breaks), THETA2_COLOR, 1.5)),
        )
        .add(legend());
    Ok(doc)
}

fn frame_and_ticks(axes: &Axes) -> Group {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;
    let black = "black";

    let mut group = Group::new()
        .set("id", "axes")
        .add(segment((left, bottom), (right, bottom), black, 1.0))
        .add(segment((left, top), (left, bottom), black, 1.0))
        .add(label(
            "Joint Angles Over Time",
            (WIDTH / 2.0, top - 16.0),
            16.0,
            "middle",
        ))
        .add(label("Frame", (WIDTH / 2.0, HEIGHT - 12.0), 12.0, "middle"))
        .add(
            label("Angle (deg)", (16.0, HEIGHT / 2.0), 12.0, "middle").set(
                "transform",
                format!("rotate(-90 16 {})", fmt_scalar(HEIGHT / 2.0)),
            ),
        );

    let (y_lo, y_hi) = axes.y_range;
    for i in 0..=Y_TICKS {
        #[allow(clippy::cast_precision_loss)]
        let v = (y_hi - y_lo).mul_add(i as f64 / Y_TICKS as f64, y_lo);
        let y = axes.y(v);
        group = group
            .add(segment((left - 4.0, y), (left, y), black, 1.0))
            .add(label(
                &format!("{v:.1}"),
                (left - 6.0, y + 4.0),
                10.0,
                "end",
            ));
    }

    let (x_lo, x_hi) = axes.x_range;
    for v in [x_lo, x_hi] {
        let x = axes.x(v);
        group = group
            .add(segment((x, bottom), (x, bottom + 4.0), black, 1.0))
            .add(label(&format!("{v:.0}"), (x, bottom + 16.0), 10.0, "middle"));
    }
    group
}

fn legend() -> Group {
    let x = WIDTH - MARGIN_RIGHT - 110.0;
    let y = MARGIN_TOP + 16.0;
    Group::new()
        .set("id", "legend")
        .add(segment((x, y - 4.0), (x + 20.0, y - 4.0), THETA1_COLOR, 2.0))
        .add(label("theta1 (shoulder)", (x + 24.0, y), 11.0, "start"))
        .add(segment((x, y + 12.0), (x + 20.0, y + 12.0), THETA2_COLOR, 2.0))
        .add(label("theta2 (elbow)", (x + 24.0, y + 16.0), 11.0, "start"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
