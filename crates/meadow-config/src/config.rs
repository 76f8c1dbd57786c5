//! Configuration structs with sensible defaults and RON persistence.

use std::f32::consts::FRAC_PI_2;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glam::Vec3;
use meadow_input::Bindings;
use meadow_orbit::{CameraLens, CameraMode, CameraSettings};
use meadow_sky::DayNightSettings;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "meadow";
const CONFIG_FILE: &str = "config.ron";

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Orbit camera tunables.
    pub camera: CameraSettings,
    /// Projection parameters.
    pub lens: CameraLens,
    /// Day/night cycle and sky palette.
    pub sky: DayNightSettings,
    /// Character movement speeds.
    pub movement: MovementConfig,
    /// Key bindings and look input.
    pub input: InputConfig,
    /// Where things start.
    pub scene: SceneConfig,
    /// Headless run length.
    pub run: RunConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Character movement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed in world units per second.
    pub move_speed: f32,
    /// Turning speed in radians per second.
    pub rotation_speed: f32,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Control-to-key table.
    pub bindings: Bindings,
    /// Invert the vertical look axis.
    pub invert_y: bool,
}

/// Initial placement of the followed character and camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Camera mode on startup.
    pub start_mode: CameraMode,
    /// Character start position.
    pub target_position: Vec3,
    /// Character start yaw in radians (0 faces +Z).
    pub target_yaw: f32,
    /// Camera position before the character is attached. `None` lets the
    /// camera take its default place behind the character.
    pub initial_camera_position: Option<Vec3>,
}

/// How long a headless run lasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Simulated frames per second.
    pub frame_rate: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub json_log: bool,
}

// --- Default implementations ---

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 50.0,
            rotation_speed: FRAC_PI_2,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            start_mode: CameraMode::ThirdPerson,
            target_position: Vec3::new(0.0, -4.8, 0.0),
            target_yaw: 0.0,
            initial_camera_position: None,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_rate: 60.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_log: false,
        }
    }
}

/// Platform configuration directory for meadow, e.g. `~/.config/meadow` on Linux.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Persistence ---

fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE)
}

/// Read and parse `path`. `Ok(None)` if the file does not exist.
fn read_config(path: &Path) -> Result<Option<Config>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    ron::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_path(config_dir);
        if let Some(config) = read_config(&path)? {
            log::info!("Loaded config from {}", path.display());
            return Ok(config);
        }
        let config = Config::default();
        config.save(config_dir)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    /// Render the config as pretty RON.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Write `config.ron` into `config_dir`, creating the directory if needed.
    ///
    /// The file is written next to the target and renamed over it, so a
    /// crash mid-write leaves the previous config intact.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_path(config_dir);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        let serialized = self.to_ron()?;

        std::fs::create_dir_all(config_dir).map_err(write_err)?;
        let staging = path.with_extension("ron.tmp");
        std::fs::write(&staging, serialized).map_err(write_err)?;
        std::fs::rename(&staging, &path).map_err(write_err)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Re-read `config.ron`. Returns the new config if it differs from
    /// `self`, `None` if it is unchanged. A deleted file is an error.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = config_path(config_dir);
        let Some(fresh) = read_config(&path)? else {
            return Err(ConfigError::Read {
                source: std::io::Error::from(ErrorKind::NotFound),
                path,
            });
        };
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk: {}", path.display());
        Ok(Some(fresh))
    }
}
