//! Perspective lens turning a [`CameraPose`] into render matrices.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::camera_controller::CameraPose;

/// Perspective projection parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLens {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Width / height.
    pub aspect_ratio: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 5000.0,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl CameraLens {
    /// Update the aspect ratio after the surface was resized.
    /// Zero-sized surfaces (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!(width, height, "ignoring resize to an empty surface");
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
    }

    /// Right-handed perspective projection.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// View matrix looking from the pose's eye toward its look-at point, +Y up.
    pub fn view_matrix(pose: &CameraPose) -> Mat4 {
        Mat4::look_at_rh(pose.position, pose.look_at, Vec3::Y)
    }

    /// Combined view-projection matrix for `pose`.
    pub fn view_projection_matrix(&self, pose: &CameraPose) -> Mat4 {
        self.projection_matrix() * Self::view_matrix(pose)
    }
}
