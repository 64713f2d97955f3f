//! Cursor physics: dial detents → smoothed angular motion

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::normalize_degrees;

/// Cursor position on the dial
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorState {
    /// Degrees in `[0, 360)`
    pub angle: f32,
    /// Degrees per tick, within `±CURSOR_MAX_SPEED`
    pub velocity: f32,
}

impl CursorState {
    /// Advance one tick with `delta` detents of new input.
    ///
    /// Friction applies every tick, so the cursor coasts to rest when the dial
    /// is left alone.
    pub fn tick(self, delta: i32) -> Self {
        let mut velocity = self.velocity + delta as f32 * CURSOR_ACCEL;
        velocity = velocity.clamp(-CURSOR_MAX_SPEED, CURSOR_MAX_SPEED);
        velocity *= CURSOR_FRICTION;
        Self {
            angle: normalize_degrees(self.angle + velocity),
            velocity,
        }
    }
}
