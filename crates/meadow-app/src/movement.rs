//! Character movement from held keys: turn in place, walk along the facing.

use meadow_config::MovementConfig;
use meadow_input::MovementInput;
use meadow_orbit::TargetTransform;

/// Whether the character is walking this frame. Drives the walk/idle clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gait {
    #[default]
    Idle,
    Walking,
}

/// Applies movement input to the followed character.
#[derive(Clone, Debug)]
pub struct TargetMover {
    /// World units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub rotation_speed: f32,
}

impl TargetMover {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
        }
    }

    /// Turn and move `target` for one step of `dt` seconds.
    ///
    /// Left turns toward +X-from-+Z (positive yaw). Only forward/back count as
    /// walking; turning in place stays idle.
    pub fn step(&self, target: &mut TargetTransform, input: MovementInput, dt: f32) -> Gait {
        let turn = f32::from(u8::from(input.left)) - f32::from(u8::from(input.right));
        if turn != 0.0 {
            target.set_yaw(target.yaw() + turn * self.rotation_speed * dt);
        }

        if !(input.forward || input.back) {
            return Gait::Idle;
        }

        let forward = target.horizontal_forward();
        let mut direction = glam::Vec3::ZERO;
        if input.forward {
            direction += forward;
        }
        if input.back {
            direction -= forward;
        }
        if direction.length_squared() > 0.0 {
            target.position += direction.normalize() * self.move_speed * dt;
        }
        Gait::Walking
    }
}
