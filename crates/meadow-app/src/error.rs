//! Application-level errors.

use meadow_config::ConfigError;
use meadow_sky::SkyError;

/// Anything that stops the demo from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Loading or saving `config.ron` failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The day/night settings were rejected.
    #[error("invalid sky settings: {0}")]
    Sky(#[from] SkyError),

    /// `run.frame_rate` must be positive and finite.
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(f64),
}
