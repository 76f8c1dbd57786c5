//! Headless meadow demo: runs the scripted session and logs what a renderer
//! would receive.

use std::process::ExitCode;

use clap::Parser;
use meadow_app::{LoggingSink, run_demo};
use meadow_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    meadow_log::init_logging(Some(&log_dir), Some(&config));
    info!("Meadow demo, config at {}", config_dir.display());

    let mut sink = LoggingSink::default();
    match run_demo(&config, &mut sink) {
        Ok(summary) => {
            if let Some(output) = summary.last_output {
                info!(
                    mode = ?output.mode,
                    camera = ?output.camera.map(|pose| pose.position),
                    sun = ?output.light.light_position,
                    "final frame"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
