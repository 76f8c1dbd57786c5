//! Orbit camera: spherical helpers, the follow/first-person camera controller,
//! and the lens used to turn a camera pose into render matrices.

pub mod camera_controller;
pub mod lens;
pub mod orbit_math;
pub mod target;

pub use camera_controller::{
    CameraController, CameraMode, CameraPose, CameraSettings, CameraState, FollowSmoothing,
};
pub use lens::CameraLens;
pub use orbit_math::{
    POLE_EPSILON, VERTICAL_LIMIT, decompose_offset, direction_from_polar_azimuth,
    forward_from_yaw, spherical_from_vertical, target_horizontal_yaw,
};
pub use target::TargetTransform;
