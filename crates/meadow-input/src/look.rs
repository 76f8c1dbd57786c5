//! Pointer look deltas.
//!
//! Pointer motion arrives between frames; the camera consumes the sum once
//! per frame and the accumulator resets to zero. [`LookAccumulator`] is for a
//! host that handles events on the render thread, [`SharedLookAccumulator`]
//! for input captured on another thread.

use std::ops::AddAssign;
use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec2;
use winit::event::{ElementState, MouseButton};

/// Pixel movement since the last consumption.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookDelta {
    /// Horizontal pixels, positive to the right.
    pub dx: f32,
    /// Vertical pixels, positive downward.
    pub dy: f32,
}

impl LookDelta {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// No movement on either axis.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl AddAssign for LookDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.dx += rhs.dx;
        self.dy += rhs.dy;
    }
}

impl From<Vec2> for LookDelta {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Same-thread accumulator.
#[derive(Clone, Debug, Default)]
pub struct LookAccumulator {
    pending: LookDelta,
}

impl LookAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add pointer movement.
    pub fn accumulate(&mut self, delta: LookDelta) {
        self.pending += delta;
    }

    /// Return everything accumulated so far and reset to zero.
    pub fn take(&mut self) -> LookDelta {
        std::mem::take(&mut self.pending)
    }

    /// Pending movement, without consuming it.
    #[must_use]
    pub fn peek(&self) -> LookDelta {
        self.pending
    }
}

/// Accumulator shared between an input thread and the frame loop.
///
/// Clones share the same pending delta.
#[derive(Clone, Debug, Default)]
pub struct SharedLookAccumulator {
    pending: Arc<Mutex<LookDelta>>,
}

impl SharedLookAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add pointer movement.
    pub fn accumulate(&self, delta: LookDelta) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending += delta;
    }

    /// Swap the pending delta with zero under the lock.
    pub fn take(&self) -> LookDelta {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }
}

/// Turns raw pointer events into look deltas while the look button is held.
#[derive(Clone, Debug)]
pub struct PointerLook {
    button: MouseButton,
    held: bool,
    last_cursor: Option<Vec2>,
}

impl Default for PointerLook {
    fn default() -> Self {
        Self::new(MouseButton::Right)
    }
}

impl PointerLook {
    /// Look while `button` is held.
    pub fn new(button: MouseButton) -> Self {
        Self {
            button,
            held: false,
            last_cursor: None,
        }
    }

    /// Whether the look button is held.
    #[must_use]
    pub fn is_looking(&self) -> bool {
        self.held
    }

    /// Process a `MouseInput` event.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == self.button {
            self.held = state == ElementState::Pressed;
        }
    }

    /// Process a `CursorMoved` event. Returns the movement since the previous
    /// cursor position if the look button is held.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<LookDelta> {
        let position = Vec2::new(x as f32, y as f32);
        let previous = self.last_cursor.replace(position)?;
        (self.held && position != previous).then(|| LookDelta::from(position - previous))
    }

    /// Process a raw `DeviceEvent::MouseMotion` delta.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) -> Option<LookDelta> {
        self.held.then(|| LookDelta::new(dx as f32, dy as f32))
    }

    /// Forget the last cursor position, e.g. when the cursor left the window.
    pub fn on_cursor_left(&mut self) {
        self.last_cursor = None;
    }
}
