//! Key bindings for character movement and the camera toggle.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Serde helper for [`KeyCode`], which has no serde support of its own.
/// Keys are written by their variant name, e.g. `"ArrowUp"`.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::key_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Look up a key by its `KeyCode` variant name. Covers letters, digits,
/// arrows and the common modifiers.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    if let Some(letter) = name.strip_prefix("Key") {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        let &[byte] = letter.as_bytes() else {
            return None;
        };
        return byte
            .is_ascii_uppercase()
            .then(|| LETTERS[usize::from(byte - b'A')]);
    }
    if let Some(digit) = name.strip_prefix("Digit") {
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3,
            KeyCode::Digit4, KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7,
            KeyCode::Digit8, KeyCode::Digit9,
        ];
        let &[byte] = digit.as_bytes() else {
            return None;
        };
        return byte.is_ascii_digit().then(|| DIGITS[usize::from(byte - b'0')]);
    }
    Some(match name {
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        _ => return None,
    })
}

/// Something the player can do from the keyboard.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Control {
    MoveForward,
    MoveBack,
    TurnLeft,
    TurnRight,
    /// Switch between first and third person.
    ToggleCamera,
}

/// One control bound to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub control: Control,
    #[serde(with = "keycode_serde")]
    pub key: KeyCode,
}

/// A key was requested for two controls at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("{key:?} is already bound to {existing:?}")]
    Conflict {
        key: KeyCode,
        existing: Control,
    },

    /// The same control appears twice in a binding list.
    #[error("{0:?} is bound more than once")]
    Duplicate(Control),

    /// A control has no key and its default key is taken.
    #[error("{0:?} is unbound and its default key is in use")]
    Unbound(Control),
}

/// Movement keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// The full control-to-key table. Every control has exactly one key and no
/// key drives two controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyBinding>", into = "Vec<KeyBinding>")]
pub struct Bindings {
    keys: Vec<KeyBinding>,
}

impl Default for Bindings {
    /// Arrow keys to walk and turn, `V` to switch camera.
    fn default() -> Self {
        Self {
            keys: vec![
                KeyBinding { control: Control::MoveForward, key: KeyCode::ArrowUp },
                KeyBinding { control: Control::MoveBack, key: KeyCode::ArrowDown },
                KeyBinding { control: Control::TurnLeft, key: KeyCode::ArrowLeft },
                KeyBinding { control: Control::TurnRight, key: KeyCode::ArrowRight },
                KeyBinding { control: Control::ToggleCamera, key: KeyCode::KeyV },
            ],
        }
    }
}

impl Bindings {
    /// Validate a binding list.
    ///
    /// Controls missing from `keys` get their default key, unless another
    /// control already uses it.
    pub fn new(mut keys: Vec<KeyBinding>) -> Result<Self, BindingError> {
        for (i, binding) in keys.iter().enumerate() {
            if let Some(other) = keys[..i].iter().find(|b| b.control == binding.control) {
                return Err(BindingError::Duplicate(other.control));
            }
            if let Some(other) = keys[..i].iter().find(|b| b.key == binding.key) {
                return Err(BindingError::Conflict {
                    key: binding.key,
                    existing: other.control,
                });
            }
        }

        for default in Self::default().keys {
            if keys.iter().any(|b| b.control == default.control) {
                continue;
            }
            if keys.iter().any(|b| b.key == default.key) {
                return Err(BindingError::Unbound(default.control));
            }
            warn!(
                control = ?default.control,
                key = ?default.key,
                "control unbound, using default key"
            );
            keys.push(default);
        }
        Ok(Self { keys })
    }

    /// Key currently bound to `control`, if any.
    #[must_use]
    pub fn key_for(&self, control: Control) -> Option<KeyCode> {
        self.keys.iter().find(|b| b.control == control).map(|b| b.key)
    }

    /// Bind `control` to `key`, replacing its previous key.
    pub fn rebind(&mut self, control: Control, key: KeyCode) -> Result<(), BindingError> {
        if let Some(other) = self.keys.iter().find(|b| b.key == key && b.control != control) {
            return Err(BindingError::Conflict {
                key,
                existing: other.control,
            });
        }
        self.keys.retain(|b| b.control != control);
        self.keys.push(KeyBinding { control, key });
        info!(?control, ?key, "control rebound");
        Ok(())
    }

    /// Whether the key bound to `control` is down.
    #[must_use]
    pub fn is_held(&self, control: Control, keyboard: &KeyboardState) -> bool {
        self.key_for(control).is_some_and(|key| keyboard.is_held(key))
    }

    /// Whether the key bound to `control` went down this frame.
    #[must_use]
    pub fn just_pressed(&self, control: Control, keyboard: &KeyboardState) -> bool {
        self.key_for(control)
            .is_some_and(|key| keyboard.just_pressed(key))
    }

    /// Read the four movement controls.
    #[must_use]
    pub fn movement(&self, keyboard: &KeyboardState) -> MovementInput {
        MovementInput {
            forward: self.is_held(Control::MoveForward, keyboard),
            back: self.is_held(Control::MoveBack, keyboard),
            left: self.is_held(Control::TurnLeft, keyboard),
            right: self.is_held(Control::TurnRight, keyboard),
        }
    }
}

impl TryFrom<Vec<KeyBinding>> for Bindings {
    type Error = BindingError;

    fn try_from(keys: Vec<KeyBinding>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<Bindings> for Vec<KeyBinding> {
    fn from(bindings: Bindings) -> Self {
        bindings.keys
    }
}
