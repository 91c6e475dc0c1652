//! SVG plots for two-link arm tracking runs.
//!
//! Two figures are produced per run:
//! - the tracking figure ([`TrackingFigure`]): target line, path points,
//!   reach annulus, effector trail and the last arm pose;
//! - the angle plot ([`render_angles`]): `theta1` and `theta2` in degrees
//!   per frame.
//!
//! Figures are saved into a counter-suffixed series (`tracking_1.svg`,
//! `tracking_2.svg`, ...) so earlier runs are never overwritten.

pub mod angles;
pub mod draw;
pub mod error;
pub mod tracking;

use std::path::{Path, PathBuf};

use svg::Document;

use twolink_core::output::{ensure_dir, numbered_path};

pub use angles::render_angles;
pub use error::PlotError;
pub use tracking::{TrackingFigure, Viewport};

/// File stem of the tracking figure series.
pub const TRACKING_STEM: &str = "tracking";
/// File stem of the angle plot series.
pub const ANGLES_STEM: &str = "angles";
/// Extension of every plot file.
pub const SVG_EXT: &str = "svg";

/// Write `document` to `path`.
///
/// # Errors
///
/// Returns [`PlotError::Io`] if the file cannot be written.
pub fn save_document(path: &Path, document: &Document) -> Result<(), PlotError> {
    svg::save(path, document)?;
    Ok(())
}

/// Write `document` as `dir/{stem}_{index}.svg`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`PlotError::Io`] if the directory or file cannot be written.
pub fn save_numbered(
    dir: &Path,
    stem: &str,
    index: u32,
    document: &Document,
) -> Result<PathBuf, PlotError> {
    ensure_dir(dir)?;
    let path = numbered_path(dir, stem, index, SVG_EXT);
    save_document(&path, document)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
