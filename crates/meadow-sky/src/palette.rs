//! Keyframed sky color over one day/night cycle.
//!
//! Colors are eased between neighbouring keyframes with a smoothstep so named
//! sky states (dawn, day, dusk, night) blend without visible seams.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SkyError;

/// Cubic ease on `[0, 1]` with zero slope at both ends. Inputs are clamped.
#[must_use]
pub fn smoothstep01(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// One sky color pinned to a point of the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyKeyframe {
    /// Position within the cycle, `[0, 1]`.
    pub fraction: f32,
    /// Color as `0xRRGGBB`.
    pub rgb: u32,
}

impl SkyKeyframe {
    pub const fn from_hex(fraction: f32, rgb: u32) -> Self {
        Self { fraction, rgb }
    }

    /// Color with each channel in `[0, 1]`.
    #[must_use]
    pub fn color(&self) -> Vec3 {
        let channel = |shift: u32| ((self.rgb >> shift) & 0xff) as f32 / 255.0;
        Vec3::new(channel(16), channel(8), channel(0))
    }
}

/// Immutable, validated list of sky keyframes covering `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SkyKeyframe>", into = "Vec<SkyKeyframe>")]
pub struct SkyPalette {
    keyframes: Vec<SkyKeyframe>,
}

impl SkyPalette {
    /// Validate and build a palette.
    ///
    /// Fractions must be finite, non-decreasing, start at exactly 0 and end
    /// at exactly 1.
    pub fn new(keyframes: Vec<SkyKeyframe>) -> Result<Self, SkyError> {
        let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
            return Err(SkyError::EmptyPalette);
        };
        if let Some(index) = keyframes.iter().position(|k| !k.fraction.is_finite()) {
            return Err(SkyError::NonFiniteFraction { index });
        }
        if first.fraction != 0.0 {
            return Err(SkyError::FirstFractionNotZero(first.fraction));
        }
        if last.fraction != 1.0 {
            return Err(SkyError::LastFractionNotOne(last.fraction));
        }
        if let Some(index) = (1..keyframes.len())
            .find(|&i| keyframes[i].fraction < keyframes[i - 1].fraction)
        {
            return Err(SkyError::Decreasing {
                index,
                fraction: keyframes[index].fraction,
            });
        }
        Ok(Self { keyframes })
    }

    pub fn keyframes(&self) -> &[SkyKeyframe] {
        &self.keyframes
    }

    /// Sky color at `time_fraction` of the cycle.
    ///
    /// Picks the last keyframe pair bracketing the time, eases the progress
    /// through the segment with [`smoothstep01`], and blends linearly. The
    /// first and last keyframe colors are returned exactly at the ends.
    #[must_use]
    pub fn color_at(&self, time_fraction: f32) -> Vec3 {
        let frames = &self.keyframes;
        let first = frames[0];
        let last = frames[frames.len() - 1];
        let t = if time_fraction.is_nan() {
            0.0
        } else {
            time_fraction.clamp(0.0, 1.0)
        };
        if t <= first.fraction {
            return first.color();
        }
        if t >= last.fraction {
            return last.color();
        }

        let index = frames
            .partition_point(|k| k.fraction <= t)
            .saturating_sub(1)
            .min(frames.len() - 2);
        let from = frames[index];
        let to = frames[index + 1];

        let span = to.fraction - from.fraction;
        let span = if span > 0.0 { span } else { 1.0 };
        let progress = smoothstep01((t - from.fraction) / span);
        from.color().lerp(to.color(), progress)
    }
}

impl Default for SkyPalette {
    /// Morning, day, afternoon, night, pre-dawn, back to morning.
    fn default() -> Self {
        Self {
            keyframes: vec![
                SkyKeyframe::from_hex(0.0, 0x93d5ff),
                SkyKeyframe::from_hex(0.25, 0x47b5ff),
                SkyKeyframe::from_hex(0.5, 0x1363df),
                SkyKeyframe::from_hex(0.6, 0x06283d),
                SkyKeyframe::from_hex(0.92, 0x06283d),
                SkyKeyframe::from_hex(1.0, 0x93d5ff),
            ],
        }
    }
}

impl TryFrom<Vec<SkyKeyframe>> for SkyPalette {
    type Error = SkyError;

    fn try_from(keyframes: Vec<SkyKeyframe>) -> Result<Self, Self::Error> {
        Self::new(keyframes)
    }
}

impl From<SkyPalette> for Vec<SkyKeyframe> {
    fn from(palette: SkyPalette) -> Self {
        palette.keyframes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> SkyPalette {
        SkyPalette::new(vec![
            SkyKeyframe::from_hex(0.0, 0x000000),
            SkyKeyframe::from_hex(1.0, 0xffffff),
        ])
        .unwrap()
    }

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep01(0.0), 0.0);
        assert_eq!(smoothstep01(1.0), 1.0);
        assert!((smoothstep01(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smoothstep01(-3.0), 0.0);
        assert_eq!(smoothstep01(7.0), 1.0);
    }

    #[test]
    fn test_smoothstep_eases_in() {
        assert!(smoothstep01(0.1) < 0.1);
        assert!(smoothstep01(0.9) > 0.9);
    }

    #[test]
    fn test_hex_color_channels() {
        let color = SkyKeyframe::from_hex(0.0, 0xff8000).color();
        assert_eq!(color.x, 1.0);
        assert!((color.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.z, 0.0);
    }

    #[test]
    fn test_endpoints_return_exact_colors() {
        let palette = SkyPalette::default();
        let frames = palette.keyframes();
        assert_eq!(palette.color_at(0.0), frames[0].color());
        assert_eq!(palette.color_at(1.0), frames[frames.len() - 1].color());
    }

    #[test]
    fn test_out_of_range_times_clamp() {
        let palette = two_stop();
        assert_eq!(palette.color_at(-0.5), Vec3::ZERO);
        assert_eq!(palette.color_at(2.0), Vec3::ONE);
        assert_eq!(palette.color_at(f32::NAN), Vec3::ZERO);
    }

    #[test]
    fn test_segment_progress_is_smoothed() {
        let palette = two_stop();
        let quarter = palette.color_at(0.25);
        let expected = smoothstep01(0.25);
        assert!((quarter.x - expected).abs() < 1e-6);
        assert!(quarter.x < 0.25);
        assert!((palette.color_at(0.5).x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_keyframe_colors_hit_exactly_at_interior_stops() {
        let palette = SkyPalette::default();
        for frame in palette.keyframes() {
            let color = palette.color_at(frame.fraction);
            assert!((color - frame.color()).length() < 1e-6);
        }
    }

    #[test]
    fn test_continuous_at_segment_boundaries() {
        let palette = SkyPalette::default();
        for frame in &palette.keyframes()[1..] {
            let at = palette.color_at(frame.fraction);
            let before = palette.color_at(frame.fraction - 1e-4);
            assert!(
                (at - before).length() < 1e-3,
                "jump at {}: {at} vs {before}",
                frame.fraction
            );
        }
    }

    #[test]
    fn test_duplicate_fraction_steps_to_later_keyframe() {
        let palette = SkyPalette::new(vec![
            SkyKeyframe::from_hex(0.0, 0x000000),
            SkyKeyframe::from_hex(0.5, 0xff0000),
            SkyKeyframe::from_hex(0.5, 0x0000ff),
            SkyKeyframe::from_hex(1.0, 0x0000ff),
        ])
        .unwrap();
        assert_eq!(palette.color_at(0.5), Vec3::Z);
        assert!(palette.color_at(0.4999).x > 0.99);
    }

    #[test]
    fn test_rejects_empty_palette() {
        assert_eq!(SkyPalette::new(vec![]), Err(SkyError::EmptyPalette));
    }

    #[test]
    fn test_rejects_palette_not_covering_cycle() {
        let late_start = vec![
            SkyKeyframe::from_hex(0.1, 0),
            SkyKeyframe::from_hex(1.0, 0),
        ];
        assert_eq!(
            SkyPalette::new(late_start),
            Err(SkyError::FirstFractionNotZero(0.1))
        );
        let early_end = vec![
            SkyKeyframe::from_hex(0.0, 0),
            SkyKeyframe::from_hex(0.9, 0),
        ];
        assert_eq!(
            SkyPalette::new(early_end),
            Err(SkyError::LastFractionNotOne(0.9))
        );
        assert!(SkyPalette::new(vec![SkyKeyframe::from_hex(0.0, 0)]).is_err());
    }

    #[test]
    fn test_rejects_decreasing_fractions() {
        let frames = vec![
            SkyKeyframe::from_hex(0.0, 0),
            SkyKeyframe::from_hex(0.6, 0),
            SkyKeyframe::from_hex(0.4, 0),
            SkyKeyframe::from_hex(1.0, 0),
        ];
        assert_eq!(
            SkyPalette::new(frames),
            Err(SkyError::Decreasing {
                index: 2,
                fraction: 0.4
            })
        );
    }

    #[test]
    fn test_rejects_nan_fraction() {
        let frames = vec![
            SkyKeyframe::from_hex(0.0, 0),
            SkyKeyframe::from_hex(f32::NAN, 0),
            SkyKeyframe::from_hex(1.0, 0),
        ];
        assert_eq!(
            SkyPalette::new(frames),
            Err(SkyError::NonFiniteFraction { index: 1 })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SkyPalette =
            ron::from_str("[(fraction: 0.0, rgb: 0x000000), (fraction: 1.0, rgb: 0xffffff)]")
                .unwrap();
        assert_eq!(ok, two_stop());
        let bad: Result<SkyPalette, _> = ron::from_str("[(fraction: 0.5, rgb: 0)]");
        assert!(bad.is_err());
    }
}
