//! Orbit camera controller: third-person follow and first-person look.
//!
//! The horizontal orbit angle is stored relative to the target's own yaw, so
//! the camera stays glued behind the target as it turns without the target
//! having to notify the camera. In first person, mouse look steers the
//! target: [`CameraController::apply_look_delta`] returns the yaw the host
//! should write back to the followed object.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::orbit_math::{
    VERTICAL_LIMIT, decompose_offset, direction_from_polar_azimuth, spherical_from_vertical,
};
use crate::target::TargetTransform;

/// Which viewpoint the camera renders from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Orbiting behind and above the target.
    #[default]
    ThirdPerson,
    /// At the target's head, looking where it faces.
    FirstPerson,
}

/// How the third-person position chases its desired point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum FollowSmoothing {
    /// Lerp by the follow factor once per update, whatever the frame time.
    /// Convergence speed therefore depends on the frame rate.
    #[default]
    PerFrame,
    /// Scale the factor by elapsed time: `1 - (1 - factor)^(dt * reference_rate)`.
    FrameRateIndependent {
        /// Frame rate (Hz) at which this matches [`FollowSmoothing::PerFrame`].
        reference_rate: f32,
    },
}

impl FollowSmoothing {
    /// Interpolation factor for one update.
    #[must_use]
    pub fn factor(self, base: f32, delta_seconds: f32) -> f32 {
        let base = base.clamp(0.0, 1.0);
        match self {
            Self::PerFrame => base,
            Self::FrameRateIndependent { reference_rate } => {
                if delta_seconds <= 0.0 || reference_rate <= 0.0 {
                    return 0.0;
                }
                (1.0 - (1.0 - base).powf(delta_seconds * reference_rate)).clamp(0.0, 1.0)
            }
        }
    }
}

/// Tunables for [`CameraController`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians of orbit per pixel of look delta.
    pub sensitivity: f32,
    /// Lowest vertical orbit angle in radians. Never below `-0.49π`.
    pub vertical_min: f32,
    /// Highest vertical orbit angle in radians. Never above `0.49π`.
    pub vertical_max: f32,
    /// Third-person distance from the pivot.
    pub follow_distance: f32,
    /// Height of the third-person pivot above the target origin.
    pub follow_height: f32,
    /// Third-person lerp factor in `[0, 1]` (1 snaps instantly).
    pub follow_smoothing: f32,
    /// How `follow_smoothing` is applied across frames.
    pub smoothing: FollowSmoothing,
    /// First-person eye offset along the view direction.
    pub eye_distance: f32,
    /// First-person eye height above the target origin.
    pub eye_height: f32,
    /// How far ahead of the eye the first-person look-at point sits.
    pub look_ahead: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            vertical_min: -VERTICAL_LIMIT,
            vertical_max: VERTICAL_LIMIT,
            follow_distance: 30.0,
            follow_height: 20.0,
            follow_smoothing: 0.4,
            smoothing: FollowSmoothing::PerFrame,
            eye_distance: 5.0,
            eye_height: 20.0,
            look_ahead: 50.0,
        }
    }
}

impl CameraSettings {
    /// Effective vertical clamp bounds, always inside `±0.49π`.
    #[must_use]
    pub fn vertical_bounds(&self) -> (f32, f32) {
        let lo = self.vertical_min.clamp(-VERTICAL_LIMIT, VERTICAL_LIMIT);
        let hi = self.vertical_max.clamp(-VERTICAL_LIMIT, VERTICAL_LIMIT);
        if lo <= hi { (lo, hi) } else { (hi, lo) }
    }
}

/// Persistent orbit state. Pose outputs are derived from this every update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Current viewpoint mode.
    pub mode: CameraMode,
    /// Pitch of the view above (+) or below (-) the target's horizontal plane.
    pub orbit_vertical: f32,
    /// Yaw of the camera relative to the target's own yaw. Zero in first person.
    pub orbit_horizontal_offset: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            mode: CameraMode::ThirdPerson,
            orbit_vertical: 0.0,
            orbit_horizontal_offset: PI,
        }
    }
}

/// Camera output for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
}

/// Maintains a camera pose relative to a moving, rotating target.
#[derive(Clone, Debug)]
pub struct CameraController {
    settings: CameraSettings,
    state: CameraState,
    pose: Option<CameraPose>,
    target: Option<TargetTransform>,
}

impl CameraController {
    /// Create a detached controller with no pose yet.
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            state: CameraState::default(),
            pose: None,
            target: None,
        }
    }

    /// Seed a pose, e.g. a configured start position, before a target attaches.
    #[must_use]
    pub fn with_pose(mut self, pose: CameraPose) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Tunables this controller was built with.
    #[must_use]
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Current mode and orbit angles.
    #[must_use]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Current viewpoint mode.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.state.mode
    }

    /// Last computed pose. `None` until a target has been attached or a pose seeded.
    #[must_use]
    pub fn pose(&self) -> Option<CameraPose> {
        self.pose
    }

    /// The controller's copy of the followed target.
    #[must_use]
    pub fn target(&self) -> Option<&TargetTransform> {
        self.target.as_ref()
    }

    /// Whether a target is being followed.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    /// Start following `target`, or stop following with `None`.
    ///
    /// Orbit angles are derived from the existing pose so the view does not
    /// jump. Without a pose the camera is placed behind and above the target
    /// at the configured follow distance and height.
    pub fn attach_to_target(&mut self, target: Option<TargetTransform>) {
        self.target = target;
        let Some(target) = target else {
            debug!("camera detached from target");
            return;
        };

        let pivot = self.pivot(&target);
        let target_yaw = target.yaw();
        let from_pose = self
            .pose
            .and_then(|pose| decompose_offset(pose.position - pivot));
        let (vertical, world_yaw) = match from_pose {
            Some(angles) => angles,
            None => {
                let placement = self.default_placement(&target);
                self.pose = Some(placement);
                decompose_offset(placement.position - pivot).unwrap_or((0.0, target_yaw + PI))
            }
        };

        let (lo, hi) = self.settings.vertical_bounds();
        self.state.orbit_vertical = vertical.clamp(lo, hi);
        self.state.orbit_horizontal_offset = match self.state.mode {
            CameraMode::ThirdPerson => world_yaw - target_yaw,
            CameraMode::FirstPerson => 0.0,
        };
        debug!(
            vertical = self.state.orbit_vertical,
            offset = self.state.orbit_horizontal_offset,
            "camera attached to target"
        );
    }

    /// Refresh the followed transform after the host moved the target.
    /// Orbit angles are kept, so the camera turns with the target.
    pub fn track_target(&mut self, target: TargetTransform) {
        if let Some(current) = self.target.as_mut() {
            *current = target;
        } else {
            trace!("ignoring target update while detached");
        }
    }

    /// Flip between third and first person. Returns the new mode.
    ///
    /// Entering first person drops the horizontal offset, so the camera
    /// faces the target's forward direction.
    pub fn toggle_mode(&mut self) -> CameraMode {
        self.state.mode = match self.state.mode {
            CameraMode::ThirdPerson => {
                self.state.orbit_horizontal_offset = 0.0;
                if let (Some(target), Some(pose)) = (self.target, self.pose.as_mut()) {
                    pose.look_at = target.position;
                }
                CameraMode::FirstPerson
            }
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
        };
        info!(mode = ?self.state.mode, "camera mode toggled");
        self.state.mode
    }

    /// Switch to `mode` if not already there.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.state.mode != mode {
            self.toggle_mode();
        }
    }

    /// Consume one frame of look input, in pixels.
    ///
    /// In first person the target should turn to where the camera looks; the
    /// requested yaw is returned for the host to apply to the real target.
    /// The controller's own copy is updated immediately so the following
    /// [`update`](Self::update) sees no lag. Returns `None` in third person,
    /// for a zero or non-finite delta, or while detached.
    pub fn apply_look_delta(&mut self, dx: f32, dy: f32) -> Option<f32> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if !dx.is_finite() || !dy.is_finite() {
            trace!(dx, dy, "ignoring non-finite look delta");
            return None;
        }
        let (lo, hi) = self.settings.vertical_bounds();
        let sensitivity = self.settings.sensitivity;
        let target = self.target.as_mut()?;

        let target_yaw = target.yaw();
        let horizontal = target_yaw + self.state.orbit_horizontal_offset - dx * sensitivity;
        self.state.orbit_vertical = (self.state.orbit_vertical - dy * sensitivity).clamp(lo, hi);
        self.state.orbit_horizontal_offset = horizontal - target_yaw;

        if self.state.mode == CameraMode::FirstPerson {
            target.set_yaw(horizontal);
            self.state.orbit_horizontal_offset = 0.0;
            return Some(horizontal);
        }
        None
    }

    /// Recompute the pose from the orbit state and the followed target.
    /// Holds the last pose while detached.
    pub fn update(&mut self, delta_seconds: f32) {
        let Some(target) = self.target else {
            return;
        };
        let polar = spherical_from_vertical(self.state.orbit_vertical);
        let azimuth = target.yaw() + self.state.orbit_horizontal_offset;

        let pose = match self.state.mode {
            CameraMode::ThirdPerson => {
                let pivot = self.pivot(&target);
                let desired = pivot
                    + direction_from_polar_azimuth(self.settings.follow_distance, polar, azimuth);
                let t = self
                    .settings
                    .smoothing
                    .factor(self.settings.follow_smoothing, delta_seconds);
                let position = match self.pose {
                    Some(current) => current.position.lerp(desired, t),
                    None => desired,
                };
                CameraPose {
                    position,
                    look_at: pivot,
                }
            }
            CameraMode::FirstPerson => {
                let eye = target.position
                    + Vec3::Y * self.settings.eye_height
                    + direction_from_polar_azimuth(self.settings.eye_distance, polar, azimuth);
                let view = direction_from_polar_azimuth(1.0, polar, azimuth);
                CameraPose {
                    position: eye,
                    look_at: eye + view * self.settings.look_ahead,
                }
            }
        };
        self.pose = Some(pose);
    }

    fn pivot(&self, target: &TargetTransform) -> Vec3 {
        target.position + Vec3::Y * self.settings.follow_height
    }

    fn default_placement(&self, target: &TargetTransform) -> CameraPose {
        let mut back = target.horizontal_forward();
        if back == Vec3::ZERO {
            back = crate::orbit_math::forward_from_yaw(target.yaw());
        }
        CameraPose {
            position: self.pivot(target) - back * self.settings.follow_distance,
            look_at: target.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn attached() -> CameraController {
        let mut cam = CameraController::new(CameraSettings::default());
        cam.attach_to_target(Some(TargetTransform::default()));
        cam
    }

    fn close(a: Vec3, b: Vec3, tol: f32) -> bool {
        (a - b).length() < tol
    }

    #[test]
    fn test_attach_without_pose_places_camera_behind_and_above() {
        let mut cam = attached();
        let pose = cam.pose().unwrap();
        assert!(close(pose.position, Vec3::new(0.0, 20.0, -30.0), 1e-4));
        assert!(cam.state().orbit_vertical.abs() < 1e-5);
        assert!((cam.state().orbit_horizontal_offset.abs() - PI).abs() < 1e-5);

        cam.update(1.0 / 60.0);
        let pose = cam.pose().unwrap();
        assert!(close(pose.position, Vec3::new(0.0, 20.0, -30.0), 1e-3));
        assert!(close(pose.look_at, Vec3::new(0.0, 20.0, 0.0), 1e-6));
    }

    #[test]
    fn test_attach_reads_existing_pose() {
        let start = Vec3::new(40.0, 20.0, 0.0);
        let mut cam = CameraController::new(CameraSettings::default()).with_pose(CameraPose {
            position: start,
            look_at: Vec3::ZERO,
        });
        cam.attach_to_target(Some(TargetTransform::default()));
        assert!((cam.state().orbit_horizontal_offset - FRAC_PI_2).abs() < 1e-5);
        assert!(cam.state().orbit_vertical.abs() < 1e-5);
        // No jump: the existing pose is kept until the first update.
        assert_eq!(cam.pose().unwrap().position, start);
    }

    #[test]
    fn test_attach_relative_to_rotated_target() {
        let target = TargetTransform::from_yaw(Vec3::ZERO, FRAC_PI_2);
        let mut cam = CameraController::new(CameraSettings::default()).with_pose(CameraPose {
            position: Vec3::new(-30.0, 20.0, 0.0),
            look_at: Vec3::ZERO,
        });
        cam.attach_to_target(Some(target));
        // World yaw of -π/2 relative to a target yaw of π/2.
        let offset = cam.state().orbit_horizontal_offset;
        assert!((offset.sin()).abs() < 1e-5 && offset.cos() < -0.99, "offset {offset}");
    }

    #[test]
    fn test_third_person_converges_monotonically() {
        let mut cam = CameraController::new(CameraSettings::default()).with_pose(CameraPose {
            position: Vec3::new(0.0, 20.0, -90.0),
            look_at: Vec3::ZERO,
        });
        cam.attach_to_target(Some(TargetTransform::default()));

        let goal = Vec3::new(0.0, 20.0, -30.0);
        let mut previous = (cam.pose().unwrap().position - goal).length();
        for _ in 0..60 {
            cam.update(1.0 / 60.0);
            let distance = (cam.pose().unwrap().position - goal).length();
            assert!(distance <= previous + 1e-5, "{distance} > {previous}");
            previous = distance;
        }
        assert!(previous < 1e-2, "did not converge: {previous}");
    }

    #[test]
    fn test_vertical_clamp_holds_under_extreme_deltas() {
        let mut cam = attached();
        for i in 0..50 {
            let dy = if i % 2 == 0 { 1.0e6 } else { -3.0e5 };
            cam.apply_look_delta(0.0, dy);
            let v = cam.state().orbit_vertical;
            assert!((-VERTICAL_LIMIT..=VERTICAL_LIMIT).contains(&v), "vertical {v}");
        }
        cam.apply_look_delta(0.0, -1.0e9);
        assert!((cam.state().orbit_vertical - VERTICAL_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_configured_bounds_cannot_exceed_limit() {
        let settings = CameraSettings {
            vertical_min: -3.0,
            vertical_max: 3.0,
            ..Default::default()
        };
        let (lo, hi) = settings.vertical_bounds();
        assert!((lo + VERTICAL_LIMIT).abs() < 1e-6);
        assert!((hi - VERTICAL_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_third_person_look_orbits_without_turning_target() {
        let mut cam = attached();
        let before = cam.state().orbit_horizontal_offset;
        let requested = cam.apply_look_delta(100.0, 0.0);
        assert!(requested.is_none());
        let after = cam.state().orbit_horizontal_offset;
        assert!((before - after - 100.0 * cam.settings().sensitivity).abs() < 1e-5);
        assert!(cam.target().unwrap().yaw().abs() < 1e-6);
    }

    #[test]
    fn test_first_person_look_steers_target() {
        let mut cam = attached();
        cam.toggle_mode();
        let requested = cam.apply_look_delta(100.0, 0.0).unwrap();
        let expected = -100.0 * cam.settings().sensitivity;
        assert!((requested - expected).abs() < 1e-6);
        assert!((cam.target().unwrap().yaw() - expected).abs() < 1e-5);
        assert_eq!(cam.state().orbit_horizontal_offset, 0.0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut cam = attached();
        cam.toggle_mode();
        let before = cam.state();
        assert!(cam.apply_look_delta(0.0, 0.0).is_none());
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        for (dx, dy) in [
            (0.0, f32::NAN),
            (f32::NAN, 0.0),
            (f32::INFINITY, 1.0),
            (1.0, f32::NEG_INFINITY),
        ] {
            let mut cam = attached();
            let before = cam.state();
            assert!(cam.apply_look_delta(dx, dy).is_none());
            assert_eq!(cam.state(), before);

            cam.update(1.0 / 60.0);
            let pose = cam.pose().unwrap();
            assert!(pose.position.is_finite() && pose.look_at.is_finite());
        }

        let mut cam = attached();
        cam.toggle_mode();
        assert!(cam.apply_look_delta(f32::NAN, 5.0).is_none());
        assert!(cam.target().unwrap().yaw().abs() < 1e-6);
        let v = cam.state().orbit_vertical;
        assert!((-VERTICAL_LIMIT..=VERTICAL_LIMIT).contains(&v), "vertical {v}");
    }

    #[test]
    fn test_look_delta_ignored_while_detached() {
        let mut cam = CameraController::new(CameraSettings::default());
        let before = cam.state();
        assert!(cam.apply_look_delta(10.0, 10.0).is_none());
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn test_toggle_round_trip_zeroes_offset() {
        let mut cam = attached();
        cam.apply_look_delta(50.0, 0.0);
        assert!(cam.state().orbit_horizontal_offset.abs() > 0.1);
        cam.toggle_mode();
        cam.toggle_mode();
        assert_eq!(cam.mode(), CameraMode::ThirdPerson);
        assert_eq!(cam.state().orbit_horizontal_offset, 0.0);
    }

    #[test]
    fn test_toggle_keeps_vertical_angle() {
        let mut cam = attached();
        cam.apply_look_delta(0.0, -40.0);
        let vertical = cam.state().orbit_vertical;
        cam.toggle_mode();
        assert_eq!(cam.state().orbit_vertical, vertical);
        cam.toggle_mode();
        assert_eq!(cam.state().orbit_vertical, vertical);
    }

    #[test]
    fn test_entering_first_person_aims_at_target() {
        let mut cam = attached();
        cam.toggle_mode();
        assert_eq!(cam.pose().unwrap().look_at, Vec3::ZERO);
    }

    #[test]
    fn test_first_person_pose_at_head_looking_ahead() {
        let mut cam = attached();
        cam.set_mode(CameraMode::FirstPerson);
        cam.update(1.0 / 60.0);
        let pose = cam.pose().unwrap();
        assert!(close(pose.position, Vec3::new(0.0, 20.0, 5.0), 1e-4));
        assert!(close(pose.look_at, Vec3::new(0.0, 20.0, 55.0), 1e-3));
    }

    #[test]
    fn test_camera_follows_target_rotation() {
        let mut cam = attached();
        cam.track_target(TargetTransform::from_yaw(Vec3::ZERO, FRAC_PI_2));
        for _ in 0..100 {
            cam.update(1.0 / 60.0);
        }
        // Target faces +X, so the camera ends up on the -X side.
        let pose = cam.pose().unwrap();
        assert!(close(pose.position, Vec3::new(-30.0, 20.0, 0.0), 1e-2));
    }

    #[test]
    fn test_update_without_target_holds_pose() {
        let pose = CameraPose {
            position: Vec3::new(1.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
        };
        let mut cam = CameraController::new(CameraSettings::default()).with_pose(pose);
        cam.update(1.0 / 60.0);
        assert_eq!(cam.pose(), Some(pose));

        let mut empty = CameraController::new(CameraSettings::default());
        empty.update(1.0 / 60.0);
        assert!(empty.pose().is_none());
    }

    #[test]
    fn test_detach_then_update_holds_pose() {
        let mut cam = attached();
        cam.update(1.0 / 60.0);
        let pose = cam.pose();
        cam.attach_to_target(None);
        cam.update(1.0 / 60.0);
        assert_eq!(cam.pose(), pose);
    }

    #[test]
    fn test_track_target_ignored_while_detached() {
        let mut cam = CameraController::new(CameraSettings::default());
        cam.track_target(TargetTransform::default());
        assert!(!cam.is_attached());
    }

    #[test]
    fn test_per_frame_smoothing_ignores_frame_time() {
        let smoothing = FollowSmoothing::PerFrame;
        assert_eq!(smoothing.factor(0.4, 1.0 / 30.0), smoothing.factor(0.4, 1.0 / 144.0));
    }

    #[test]
    fn test_frame_rate_independent_smoothing() {
        let smoothing = FollowSmoothing::FrameRateIndependent {
            reference_rate: 60.0,
        };
        assert!((smoothing.factor(0.4, 1.0 / 60.0) - 0.4).abs() < 1e-5);
        // Two 120 Hz steps cover the same ground as one 60 Hz step.
        let half = smoothing.factor(0.4, 1.0 / 120.0);
        let combined = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((combined - 0.4).abs() < 1e-5);
        assert_eq!(smoothing.factor(0.4, 0.0), 0.0);
    }
}
