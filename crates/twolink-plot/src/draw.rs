//! Shared SVG drawing helpers.
//!
//! Path data is built as raw `d` strings so coordinates keep `f64`
//! precision (the `svg` crate's `Data` builder uses `f32`).

use svg::node::element::{Circle, Line, Path, Text};

/// Decimal places written for coordinates.
pub const PRECISION: usize = 3;

/// Format a scalar to [`PRECISION`], stripping trailing zeros.
///
/// Negative zero is written as `0`.
pub fn fmt_scalar(v: f64) -> String {
    let s = format!("{v:.PRECISION$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s
    };
    if s == "-0" { "0".to_owned() } else { s }
}

/// `d` attribute for a polyline through `points`, split into a new
/// subpath wherever `breaks[i]` is set before point `i`.
pub fn polyline_d(points: &[(f64, f64)], breaks: &[bool]) -> String {
    let mut d = String::with_capacity(points.len() * 16);
    for (i, &(x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 || breaks.get(i).copied().unwrap_or(false) {
            'M'
        } else {
            'L'
        };
        if !d.is_empty() {
            d.push(' ');
        }
        d.push(cmd);
        d.push_str(&fmt_scalar(x));
        d.push(',');
        d.push_str(&fmt_scalar(y));
    }
    d
}

/// Stroked, unfilled path.
pub fn stroke(d: String, color: &str, width: f64) -> Path {
    Path::new()
        .set("d", d)
        .set("fill", "none")
        .set("stroke", color)
        .set("stroke-width", fmt_scalar(width))
        .set("stroke-linejoin", "round")
        .set("stroke-linecap", "round")
}

/// Straight segment between two points.
pub fn segment(from: (f64, f64), to: (f64, f64), color: &str, width: f64) -> Line {
    Line::new()
        .set("x1", fmt_scalar(from.0))
        .set("y1", fmt_scalar(from.1))
        .set("x2", fmt_scalar(to.0))
        .set("y2", fmt_scalar(to.1))
        .set("stroke", color)
        .set("stroke-width", fmt_scalar(width))
        .set("stroke-linecap", "round")
}

/// Filled dot.
pub fn dot(center: (f64, f64), r: f64, color: &str) -> Circle {
    Circle::new()
        .set("cx", fmt_scalar(center.0))
        .set("cy", fmt_scalar(center.1))
        .set("r", fmt_scalar(r))
        .set("fill", color)
}

/// Text label anchored at `at`.
pub fn label(content: &str, at: (f64, f64), size: f64, anchor: &str) -> Text {
    Text::new(content)
        .set("x", fmt_scalar(at.0))
        .set("y", fmt_scalar(at.1))
        .set("font-family", "sans-serif")
        .set("font-size", fmt_scalar(size))
        .set("text-anchor", anchor)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
