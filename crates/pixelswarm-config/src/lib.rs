//! Configuration for pixelswarm.
//!
//! Settings live in `config.toml` under the platform config directory. A
//! missing file means defaults; a malformed one is reported to the caller.
//! Scripts are separate files referenced from the config and may be TOML or
//! JSON.

mod error;
mod script;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use pixelswarm_core::{Rgba, ShapeKind, Step, checked_radius};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use script::load_script;

const APP_NAME: &str = "pixelswarm";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "pixelswarm.log";

/// Frame rate bounds accepted from the config file.
const MIN_FPS: u32 = 1;
const MAX_FPS: u32 = 240;

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial particle radius in canvas dots.
    pub radius: f64,
    /// Shape of newly born particles.
    pub shape: ShapeKind,
    /// Color particles fall back to when a move carries none.
    pub color: Rgba,
    /// Target repaint rate.
    pub fps: u32,
    /// Fixed RNG seed; entropy is used when absent.
    pub seed: Option<u64>,
    /// Text shown when an image cannot be loaded.
    pub fallback_text: String,
    /// Script to play on startup; the built-in greeting when absent.
    pub script: Option<PathBuf>,
    /// Where log output goes.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: 1.0,
            shape: ShapeKind::default(),
            color: Rgba::PARTICLE,
            fps: 60,
            seed: None,
            fallback_text: "wtf?".to_string(),
            script: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load from the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Path of the config file, if the platform has a config directory.
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolved log file path.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE)))
    }

    /// Time between repaints.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.clamp(MIN_FPS, MAX_FPS)))
    }

    /// The configured script, or the built-in greeting.
    pub fn steps(&self) -> Result<Vec<Step>, ConfigError> {
        match &self.script {
            Some(path) => load_script(path),
            None => Ok(Step::greeting()),
        }
    }

    fn sanitized(mut self) -> Self {
        self.fps = self.fps.clamp(MIN_FPS, MAX_FPS);
        self.radius = checked_radius(self.radius).unwrap_or(Self::default().radius);
        self
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}
