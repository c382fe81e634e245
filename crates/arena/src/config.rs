//! Session configuration: look sensitivity, spawning and the headless run.
//! Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Session settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Seconds between enemy spawns.
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval: f32,
    /// Radius of the spawn ring around the arena center.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
    /// Enemies placed on the ring when the session starts.
    #[serde(default = "default_initial_enemies")]
    pub initial_enemies: usize,
    /// Score awarded per kill.
    #[serde(default = "default_kill_score")]
    pub kill_score: u32,
    /// Fixed RNG seed. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Ticks per second for the headless driver.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Length of a headless run in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f32,
    /// Pace the headless run against the wall clock instead of fixed steps.
    #[serde(default)]
    pub realtime: bool,
}

fn default_sensitivity() -> f32 {
    1.0
}
fn default_spawn_interval() -> f32 {
    10.0
}
fn default_spawn_radius() -> f32 {
    30.0
}
fn default_initial_enemies() -> usize {
    5
}
fn default_kill_score() -> u32 {
    100
}
fn default_tick_rate() -> f64 {
    60.0
}
fn default_duration_secs() -> f32 {
    60.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            spawn_interval: default_spawn_interval(),
            spawn_radius: default_spawn_radius(),
            initial_enemies: default_initial_enemies(),
            kill_score: default_kill_score(),
            seed: None,
            tick_rate: default_tick_rate(),
            duration_secs: default_duration_secs(),
            realtime: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}
