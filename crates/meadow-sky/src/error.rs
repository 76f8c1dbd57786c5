//! Sky configuration errors.

/// Rejected day/night or palette configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkyError {
    /// The cycle duration was zero, negative, or not a number.
    #[error("cycle duration must be positive, got {0}")]
    InvalidCycleDuration(f64),

    /// The palette has no keyframes.
    #[error("sky palette has no keyframes")]
    EmptyPalette,

    /// A keyframe fraction is NaN or infinite.
    #[error("keyframe {index} has a non-finite fraction")]
    NonFiniteFraction {
        /// Position of the offending keyframe.
        index: usize,
    },

    /// The first keyframe does not start the cycle.
    #[error("first keyframe must be at fraction 0, got {0}")]
    FirstFractionNotZero(f32),

    /// The last keyframe does not end the cycle.
    #[error("last keyframe must be at fraction 1, got {0}")]
    LastFractionNotOne(f32),

    /// Fractions go backwards.
    #[error("keyframe {index} at {fraction} comes before the previous keyframe")]
    Decreasing {
        /// Position of the offending keyframe.
        index: usize,
        /// Its fraction.
        fraction: f32,
    },
}
