//! Spherical-coordinate helpers shared by the orbit camera.
//!
//! Conventions: +Y is up, azimuth 0 points toward +Z and grows toward +X, so
//! `atan2(x, z)` recovers the azimuth of any horizontal direction.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

/// Largest magnitude the vertical orbit angle may reach, in radians.
/// Keeps the view direction from flipping through the poles.
pub const VERTICAL_LIMIT: f32 = 0.49 * PI;

/// Margin kept between the polar angle and the poles before it feeds trig.
pub const POLE_EPSILON: f32 = 0.05;

/// Offsets shorter than this cannot be decomposed into angles.
const MIN_OFFSET_LENGTH: f32 = 1e-6;

/// Convert a vertical orbit angle (pitch above the horizontal plane) into a
/// polar angle measured from +Y, clamped away from both poles.
#[must_use]
pub fn spherical_from_vertical(vertical_angle: f32) -> f32 {
    (FRAC_PI_2 - vertical_angle).clamp(POLE_EPSILON, PI - POLE_EPSILON)
}

/// Standard spherical-to-Cartesian conversion.
#[must_use]
pub fn direction_from_polar_azimuth(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}

/// Horizontal yaw of a forward vector. The vertical component is ignored.
#[must_use]
pub fn target_horizontal_yaw(forward: Vec3) -> f32 {
    forward.x.atan2(forward.z)
}

/// Unit horizontal forward vector for a yaw, the inverse of
/// [`target_horizontal_yaw`].
#[must_use]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Split an offset from a pivot into `(vertical_angle, world_yaw)`.
///
/// Returns `None` for a (near) zero-length offset. The vertical angle is not
/// clamped here; callers apply [`VERTICAL_LIMIT`] themselves.
#[must_use]
pub fn decompose_offset(offset: Vec3) -> Option<(f32, f32)> {
    let radius = offset.length();
    if !radius.is_finite() || radius < MIN_OFFSET_LENGTH {
        return None;
    }
    let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
    Some((FRAC_PI_2 - polar, offset.x.atan2(offset.z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_level_view_is_equatorial() {
        assert!((spherical_from_vertical(0.0) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_polar_clamped_away_from_poles() {
        assert!((spherical_from_vertical(10.0) - POLE_EPSILON).abs() < 1e-6);
        assert!((spherical_from_vertical(-10.0) - (PI - POLE_EPSILON)).abs() < 1e-6);
    }

    #[test]
    fn test_azimuth_zero_points_to_positive_z() {
        let dir = direction_from_polar_azimuth(2.0, FRAC_PI_2, 0.0);
        assert!(approx(dir, Vec3::new(0.0, 0.0, 2.0)), "got {dir}");
    }

    #[test]
    fn test_azimuth_recovered_by_atan2() {
        for azimuth in [-2.5_f32, -1.0, 0.3, 1.2, 3.0] {
            let dir = direction_from_polar_azimuth(5.0, 1.0, azimuth);
            assert!((dir.x.atan2(dir.z) - azimuth).abs() < 1e-5);
        }
    }

    #[test]
    fn test_direction_has_requested_length() {
        let dir = direction_from_polar_azimuth(30.0, 0.7, 2.1);
        assert!((dir.length() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_target_yaw_of_axis_vectors() {
        assert!(target_horizontal_yaw(Vec3::Z).abs() < 1e-6);
        assert!((target_horizontal_yaw(Vec3::X) - FRAC_PI_2).abs() < 1e-6);
        assert!((target_horizontal_yaw(Vec3::NEG_Z).abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_forward_from_yaw_inverts_target_yaw() {
        let yaw = 1.1;
        assert!((target_horizontal_yaw(forward_from_yaw(yaw)) - yaw).abs() < 1e-6);
    }

    #[test]
    fn test_decompose_inverts_direction() {
        let vertical = FRAC_PI_4;
        let yaw = -2.0;
        let offset =
            direction_from_polar_azimuth(12.0, spherical_from_vertical(vertical), yaw);
        let (v, y) = decompose_offset(offset).unwrap();
        assert!((v - vertical).abs() < 1e-4);
        assert!((y - yaw).abs() < 1e-4);
    }

    #[test]
    fn test_decompose_rejects_zero_offset() {
        assert!(decompose_offset(Vec3::ZERO).is_none());
    }
}
