//! Held-key tracking keyed by physical key codes.
//!
//! Movement keys are read as "held" each frame, while the camera toggle is
//! an edge: it fires once on the frame the key goes down.

use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Platform-independent key event.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub state: ElementState,
    /// OS auto-repeat; ignored.
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn pressed(key: KeyCode) -> Self {
        Self {
            key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(key: KeyCode) -> Self {
        Self {
            key,
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Keys held now, plus keys that went down since the last
/// [`end_frame`](Self::end_frame).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one key event. Auto-repeat presses are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                self.held.remove(&event.key);
            }
        }
    }

    /// Whether `key` is down right now.
    #[must_use]
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Whether `key` went down since the last [`end_frame`](Self::end_frame).
    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Forget edges. Call once per frame after input has been read.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }
}
