//! Command-line argument parsing for the meadow demo.

use std::path::PathBuf;

use clap::Parser;
use meadow_orbit::CameraMode;

use crate::Config;

/// Meadow command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "meadow", about = "Orbit camera and day/night cycle demo")]
pub struct CliArgs {
    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Length of a full day/night cycle in seconds.
    #[arg(long)]
    pub cycle_seconds: Option<f64>,

    /// Look sensitivity in radians per pixel.
    #[arg(long)]
    pub sensitivity: Option<f32>,

    /// Start in first person.
    #[arg(long)]
    pub first_person: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(frames) = args.frames {
            self.run.frames = frames;
        }
        if let Some(cycle) = args.cycle_seconds {
            self.sky.cycle_seconds = cycle;
        }
        if let Some(sensitivity) = args.sensitivity {
            self.camera.sensitivity = sensitivity;
        }
        if args.first_person {
            self.scene.start_mode = CameraMode::FirstPerson;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
