//! Input plumbing for the scene host: look deltas from the pointer, held keys,
//! and the key bindings that turn them into movement and camera controls.

pub mod bindings;
pub mod keyboard;
pub mod look;

pub use bindings::{BindingError, Bindings, Control, KeyBinding, MovementInput};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use look::{LookAccumulator, LookDelta, PointerLook, SharedLookAccumulator};
