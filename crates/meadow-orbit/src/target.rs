//! The transform of the object the camera follows.

use glam::Vec3;

use crate::orbit_math::{forward_from_yaw, target_horizontal_yaw};

/// World position and facing of the followed object.
///
/// Owned by whoever moves the object; the camera only keeps a copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetTransform {
    /// World position of the object origin.
    pub position: Vec3,
    /// World forward direction. Need not be normalized.
    pub forward: Vec3,
}

impl TargetTransform {
    /// Build a transform facing the horizontal direction given by `yaw`.
    #[must_use]
    pub fn from_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            forward: forward_from_yaw(yaw),
        }
    }

    /// Horizontal facing angle, `atan2(forward.x, forward.z)`.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        target_horizontal_yaw(self.forward)
    }

    /// Turn the object to face `yaw` on the horizontal plane.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.forward = forward_from_yaw(yaw);
    }

    /// Forward direction flattened onto the ground plane, or zero if the
    /// object faces straight up or down.
    #[must_use]
    pub fn horizontal_forward(&self) -> Vec3 {
        Vec3::new(self.forward.x, 0.0, self.forward.z).normalize_or_zero()
    }
}

impl Default for TargetTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_faces_positive_z() {
        let target = TargetTransform::default();
        assert!(target.yaw().abs() < 1e-6);
    }

    #[test]
    fn test_set_yaw_turns_forward() {
        let mut target = TargetTransform::default();
        target.set_yaw(FRAC_PI_2);
        assert!((target.forward - Vec3::X).length() < 1e-6);
        assert!((target.yaw() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_forward_drops_pitch() {
        let target = TargetTransform {
            position: Vec3::ZERO,
            forward: Vec3::new(0.0, 5.0, 5.0),
        };
        let flat = target.horizontal_forward();
        assert!((flat - Vec3::Z).length() < 1e-6);
    }
}
