//! Headless demo run: a short scripted session fed through the frame loop.
//!
//! The script spawns the character a few frames late, walks and turns it,
//! switches to first person, drags the view with the right mouse button and
//! switches back.

use meadow_config::Config;
use meadow_input::RawKeyEvent;
use meadow_orbit::{CameraLens, CameraPose, TargetTransform};
use meadow_sky::LightSnapshot;
use tracing::{debug, info, trace};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::error::AppError;
use crate::frame_loop::{FIXED_DT, FrameLoop};
use crate::scene::{FrameOutput, FrameSink, Scene};

/// Frame on which the character spawns.
const SPAWN_FRAME: u32 = 5;
const DRAG_START: u32 = 240;
const DRAG_END: u32 = 300;
const DRAG_STEP_PX: f64 = 4.0;

#[derive(Clone, Copy, Debug)]
enum ScriptAction {
    Spawn,
    Key(RawKeyEvent),
    LookButton(ElementState),
    Cursor(f64, f64),
}

fn script_actions(frame: u32) -> Vec<ScriptAction> {
    let mut actions = Vec::new();
    match frame {
        SPAWN_FRAME => actions.push(ScriptAction::Spawn),
        30 => actions.push(ScriptAction::Key(RawKeyEvent::pressed(KeyCode::ArrowUp))),
        90 => actions.push(ScriptAction::Key(RawKeyEvent::pressed(KeyCode::ArrowLeft))),
        120 => actions.push(ScriptAction::Key(RawKeyEvent::released(KeyCode::ArrowLeft))),
        150 => actions.push(ScriptAction::Key(RawKeyEvent::released(KeyCode::ArrowUp))),
        200 | 360 => actions.push(ScriptAction::Key(RawKeyEvent::pressed(KeyCode::KeyV))),
        201 | 361 => actions.push(ScriptAction::Key(RawKeyEvent::released(KeyCode::KeyV))),
        238 => actions.push(ScriptAction::Cursor(400.0, 300.0)),
        239 => actions.push(ScriptAction::LookButton(ElementState::Pressed)),
        DRAG_END => actions.push(ScriptAction::LookButton(ElementState::Released)),
        _ => {}
    }
    if (DRAG_START..DRAG_END).contains(&frame) {
        let x = 400.0 + DRAG_STEP_PX * f64::from(frame - DRAG_START + 1);
        actions.push(ScriptAction::Cursor(x, 300.0));
    }
    actions
}

/// What a demo run ended with.
#[derive(Clone, Debug)]
pub struct DemoSummary {
    pub frames: u64,
    pub updates: u64,
    pub sim_seconds: f64,
    pub target: Option<TargetTransform>,
    pub last_output: Option<FrameOutput>,
}

/// Run the scripted session for `config.run.frames` frames, rendering into `sink`.
pub fn run_demo(config: &Config, sink: &mut impl FrameSink) -> Result<DemoSummary, AppError> {
    let frame_rate = config.run.frame_rate;
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(AppError::InvalidFrameRate(frame_rate));
    }
    let frame_time = 1.0 / frame_rate;

    let mut scene = Scene::from_config(config)?;
    let mut frames = FrameLoop::new(FIXED_DT);
    let mut latest: Option<FrameOutput> = None;

    info!(
        frames = config.run.frames,
        frame_rate,
        cycle_seconds = config.sky.cycle_seconds,
        "starting demo run"
    );

    for frame in 0..config.run.frames {
        for action in script_actions(frame) {
            match action {
                ScriptAction::Spawn => scene.spawn_target(TargetTransform::from_yaw(
                    config.scene.target_position,
                    config.scene.target_yaw,
                )),
                ScriptAction::Key(event) => scene.key_event(event),
                ScriptAction::LookButton(state) => scene.pointer_button(MouseButton::Right, state),
                ScriptAction::Cursor(x, y) => scene.cursor_moved(x, y),
            }
        }

        frames.tick_with(
            frame_time,
            |dt, _| latest = Some(scene.frame(dt)),
            |_alpha| {},
        );
        if let Some(output) = latest.as_ref() {
            Scene::render(output, sink);
        }
    }

    let summary = DemoSummary {
        frames: frames.frame_count(),
        updates: frames.update_count(),
        sim_seconds: frames.total_sim_time(),
        target: scene.target().copied(),
        last_output: latest,
    };
    info!(
        frames = summary.frames,
        updates = summary.updates,
        sim_seconds = summary.sim_seconds,
        "demo run finished"
    );
    Ok(summary)
}

/// Sink that logs what a renderer would receive.
#[derive(Debug, Default)]
pub struct LoggingSink {
    pub camera_updates: u64,
    pub light_updates: u64,
    lit: Option<bool>,
}

impl FrameSink for LoggingSink {
    fn apply_camera(&mut self, pose: &CameraPose, lens: &CameraLens) {
        self.camera_updates += 1;
        let view_proj = lens.view_projection_matrix(pose);
        trace!(
            position = ?pose.position,
            look_at = ?pose.look_at,
            det = view_proj.determinant(),
            "camera"
        );
    }

    fn apply_light(&mut self, light: &LightSnapshot) {
        self.light_updates += 1;
        if self.lit != Some(light.shadows_enabled) {
            debug!(
                position = ?light.light_position,
                intensity = light.intensity,
                sky = ?light.sky_color,
                "sun {}",
                if light.shadows_enabled { "up" } else { "down" }
            );
            self.lit = Some(light.shadows_enabled);
        }
        trace!(intensity = light.intensity, "light");
    }
}
