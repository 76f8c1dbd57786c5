//! Day/night lighting: a sun orbiting in a fixed plane, a shadow policy that
//! switches off below the horizon, and a keyframed sky color.

pub mod day_night;
mod error;
pub mod palette;

pub use day_night::{DayNightController, DayNightSettings, LightSnapshot};
pub use error::SkyError;
pub use palette::{SkyKeyframe, SkyPalette, smoothstep01};
