//! Day/night cycle: a sun circling the world in a fixed vertical plane.
//!
//! The orbit is derived once from the configured initial light position:
//! the X/Y components give the radius and starting phase, and Z stays fixed
//! for the whole cycle. Below the horizon the light is switched off and stops
//! casting shadows, since nothing occludes it from underneath the ground.

use std::f64::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SkyError;
use crate::palette::SkyPalette;

/// Fraction of the orbit radius a height must exceed to count as above the
/// horizon. Absorbs round-off such as `sin(π) != 0`.
const HORIZON_EPSILON: f64 = 1e-9;

/// Configuration for [`DayNightController`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightSettings {
    /// Length of one full day in seconds. Must be positive.
    pub cycle_seconds: f64,
    /// Light intensity while the sun is above the horizon.
    pub base_intensity: f32,
    /// Where the sun starts; fixes the orbit plane, radius and phase.
    pub initial_light_position: Vec3,
    /// Sky colors over the cycle.
    pub palette: SkyPalette,
}

impl Default for DayNightSettings {
    fn default() -> Self {
        Self {
            cycle_seconds: 240.0,
            base_intensity: 2.0,
            initial_light_position: Vec3::new(500.0, 0.0, 0.0),
            palette: SkyPalette::default(),
        }
    }
}

/// Lighting for one frame, applied by the host to its directional light
/// and clear color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSnapshot {
    /// Sun position in world space.
    pub light_position: Vec3,
    /// Directional light intensity; zero below the horizon.
    pub intensity: f32,
    /// Whether the sun casts shadows this frame.
    pub shadows_enabled: bool,
    /// Background color.
    pub sky_color: Vec3,
}

/// Drives the sun and sky from an externally supplied clock.
#[derive(Clone, Debug)]
pub struct DayNightController {
    settings: DayNightSettings,
    elapsed_seconds: f64,
    orbit_radius: f64,
    orbit_phase0: f64,
    fixed_axis_offset: f32,
    current: LightSnapshot,
}

impl DayNightController {
    /// Derive the orbit from the initial light position and start the clock at zero.
    pub fn new(settings: DayNightSettings) -> Result<Self, SkyError> {
        let cycle = settings.cycle_seconds;
        if !cycle.is_finite() || cycle <= 0.0 {
            return Err(SkyError::InvalidCycleDuration(cycle));
        }

        let initial = settings.initial_light_position;
        let (x, y) = (f64::from(initial.x), f64::from(initial.y));
        let radius = x.hypot(y);
        let orbit_radius = if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            1.0
        };

        let mut controller = Self {
            orbit_radius,
            orbit_phase0: y.atan2(x),
            fixed_axis_offset: initial.z,
            elapsed_seconds: 0.0,
            current: LightSnapshot {
                light_position: initial,
                intensity: 0.0,
                shadows_enabled: false,
                sky_color: settings.palette.color_at(0.0),
            },
            settings,
        };
        controller.current = controller.compute();
        debug!(
            radius = controller.orbit_radius,
            phase0 = controller.orbit_phase0,
            above_horizon = controller.current.shadows_enabled,
            "day/night cycle initialized"
        );
        Ok(controller)
    }

    pub fn settings(&self) -> &DayNightSettings {
        &self.settings
    }

    /// Total seconds fed through [`advance`](Self::advance).
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Position within the current cycle, `[0, 1)`.
    pub fn cycle_fraction(&self) -> f64 {
        self.elapsed_seconds.rem_euclid(self.settings.cycle_seconds) / self.settings.cycle_seconds
    }

    /// Lighting as of the last advance (or construction).
    pub fn snapshot(&self) -> LightSnapshot {
        self.current
    }

    /// Move the clock forward and recompute the lighting.
    ///
    /// Negative or non-finite deltas are ignored; the clock never runs back.
    pub fn advance(&mut self, delta_seconds: f64) -> LightSnapshot {
        if delta_seconds.is_finite() && delta_seconds >= 0.0 {
            self.elapsed_seconds += delta_seconds;
        } else {
            warn!(delta_seconds, "ignoring invalid day/night time step");
        }

        let next = self.compute();
        if next.shadows_enabled != self.current.shadows_enabled {
            debug!(
                fraction = self.cycle_fraction(),
                "sun {}",
                if next.shadows_enabled { "rose" } else { "set" }
            );
        }
        self.current = next;
        next
    }

    fn compute(&self) -> LightSnapshot {
        let fraction = self.cycle_fraction();
        let phase = self.orbit_phase0 + fraction * TAU;
        let x = self.orbit_radius * phase.cos();
        let y = self.orbit_radius * phase.sin();

        let above_horizon = y > self.orbit_radius * HORIZON_EPSILON;
        LightSnapshot {
            light_position: Vec3::new(x as f32, y as f32, self.fixed_axis_offset),
            intensity: if above_horizon {
                self.settings.base_intensity
            } else {
                0.0
            },
            shadows_enabled: above_horizon,
            sky_color: self.settings.palette.color_at(fraction as f32),
        }
    }
}
