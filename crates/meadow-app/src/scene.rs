//! The scene host: owns the followed character and the controllers, and runs
//! them in a fixed order once per frame.

use meadow_config::Config;
use meadow_input::{
    BindingError, Bindings, Control, KeyboardState, LookAccumulator, LookDelta, PointerLook,
    RawKeyEvent,
};
use meadow_orbit::{CameraController, CameraLens, CameraMode, CameraPose, TargetTransform};
use meadow_sky::{DayNightController, LightSnapshot, SkyError};
use tracing::{debug, info};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::movement::{Gait, TargetMover};

/// Everything a renderer needs from one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    /// `None` until the camera has a pose (target attached or start pose configured).
    pub camera: Option<CameraPose>,
    pub mode: CameraMode,
    pub lens: CameraLens,
    pub light: LightSnapshot,
    pub gait: Gait,
}

/// Receives frame results. The renderer seam.
pub trait FrameSink {
    fn apply_camera(&mut self, pose: &CameraPose, lens: &CameraLens);
    fn apply_light(&mut self, light: &LightSnapshot);
}

/// Character, camera and sun, plus the input state that drives them.
#[derive(Debug)]
pub struct Scene {
    camera: CameraController,
    sky: DayNightController,
    lens: CameraLens,
    target: Option<TargetTransform>,
    mover: TargetMover,
    bindings: Bindings,
    keyboard: KeyboardState,
    pointer: PointerLook,
    look: LookAccumulator,
    invert_y: bool,
}

impl Scene {
    /// Build the scene from config. The character is not spawned yet.
    pub fn from_config(config: &Config) -> Result<Self, SkyError> {
        let sky = DayNightController::new(config.sky.clone())?;

        let mut camera = CameraController::new(config.camera.clone());
        if let Some(position) = config.scene.initial_camera_position {
            camera = camera.with_pose(CameraPose {
                position,
                look_at: config.scene.target_position,
            });
        }
        camera.set_mode(config.scene.start_mode);

        Ok(Self {
            camera,
            sky,
            lens: config.lens.clone(),
            target: None,
            mover: TargetMover::from_config(&config.movement),
            bindings: config.input.bindings.clone(),
            keyboard: KeyboardState::new(),
            pointer: PointerLook::default(),
            look: LookAccumulator::new(),
            invert_y: config.input.invert_y,
        })
    }

    /// The character arrived; the camera starts following it.
    pub fn spawn_target(&mut self, target: TargetTransform) {
        info!(position = ?target.position, yaw = target.yaw(), "target spawned");
        self.target = Some(target);
        self.camera.attach_to_target(Some(target));
    }

    /// The character is gone; the camera holds its last pose.
    pub fn despawn_target(&mut self) {
        self.target = None;
        self.camera.attach_to_target(None);
    }

    pub fn key_event(&mut self, event: RawKeyEvent) {
        self.keyboard.process_raw(event);
    }

    pub fn pointer_button(&mut self, button: MouseButton, state: ElementState) {
        self.pointer.on_button(button, state);
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some(delta) = self.pointer.on_cursor_moved(x, y) {
            self.look.accumulate(delta);
        }
    }

    /// Raw device motion, used while the cursor is grabbed.
    pub fn raw_motion(&mut self, dx: f64, dy: f64) {
        if let Some(delta) = self.pointer.on_raw_motion(dx, dy) {
            self.look.accumulate(delta);
        }
    }

    /// The window lost focus: no key stays held and the next cursor
    /// position starts a fresh drag.
    pub fn focus_lost(&mut self) {
        self.keyboard.release_all();
        self.pointer.on_cursor_left();
    }

    /// Feed a look delta directly, bypassing the pointer button.
    pub fn look_input(&mut self, delta: LookDelta) {
        self.look.accumulate(delta);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.lens.resize(width, height);
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn sky(&self) -> &DayNightController {
        &self.sky
    }

    pub fn target(&self) -> Option<&TargetTransform> {
        self.target.as_ref()
    }

    /// Bind `control` to `key` for the rest of the session.
    pub fn rebind(&mut self, control: Control, key: KeyCode) -> Result<(), BindingError> {
        self.bindings.rebind(control, key)
    }

    /// Run one frame of `delta_seconds`.
    ///
    /// Order: movement, camera toggle, look input, camera update, sky advance.
    pub fn frame(&mut self, delta_seconds: f64) -> FrameOutput {
        let dt = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            delta_seconds as f32
        } else {
            0.0
        };

        let mut gait = Gait::Idle;
        if let Some(target) = self.target.as_mut() {
            let input = self.bindings.movement(&self.keyboard);
            gait = self.mover.step(target, input, dt);
            self.camera.track_target(*target);
        }

        if self.bindings.just_pressed(Control::ToggleCamera, &self.keyboard) {
            self.camera.toggle_mode();
        }

        let look = self.look.take();
        let dy = if self.invert_y { -look.dy } else { look.dy };
        if let Some(yaw) = self.camera.apply_look_delta(look.dx, dy)
            && let Some(target) = self.target.as_mut()
        {
            target.set_yaw(yaw);
            debug!(yaw, "target turned to camera heading");
        }

        self.camera.update(dt);
        let light = self.sky.advance(delta_seconds);
        self.keyboard.end_frame();

        FrameOutput {
            camera: self.camera.pose(),
            mode: self.camera.mode(),
            lens: self.lens.clone(),
            light,
            gait,
        }
    }

    /// Hand `output` to `sink`. The camera is skipped while it has no pose.
    pub fn render(output: &FrameOutput, sink: &mut impl FrameSink) {
        if let Some(pose) = output.camera.as_ref() {
            sink.apply_camera(pose, &output.lens);
        }
        sink.apply_light(&output.light);
    }
}
