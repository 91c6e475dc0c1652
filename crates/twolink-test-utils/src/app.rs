//! Bevy test stepping helpers.

use bevy::prelude::*;

/// Run `n` frames (calls `app.update()` `n` times).
pub fn step_n(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
