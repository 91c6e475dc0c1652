//! Counter-suffixed output file series.
//!
//! Every run writes `stem_N.ext` files into an output directory. The counter
//! `N` starts at 1 and is shared by all files of a run, so the tracking plot,
//! angle plot and recording of one run carry the same number.

use std::path::{Path, PathBuf};

/// Build `dir/stem_index.ext`.
#[must_use]
pub fn numbered_path(dir: &Path, stem: &str, index: u32, ext: &str) -> PathBuf {
    dir.join(format!("{stem}_{index}.{ext}"))
}

/// Smallest index `>= 1` for which none of the `(stem, ext)` files exist.
#[must_use]
pub fn next_free_index(dir: &Path, files: &[(&str, &str)]) -> u32 {
    (1..u32::MAX)
        .find(|&index| {
            files
                .iter()
                .all(|(stem, ext)| !numbered_path(dir, stem, index, ext).exists())
        })
        .unwrap_or(u32::MAX)
}

/// Create `dir` (and parents) if it does not exist.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}
