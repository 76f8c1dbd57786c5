//! Configuration for the meadow scene.
//!
//! Settings persist to disk as `config.ron`, every section falls back to its
//! defaults when missing, and command-line flags override loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, InputConfig, MovementConfig, RunConfig, SceneConfig, default_config_dir,
};
pub use error::ConfigError;
