//! Game configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock game. Values are checked by [`GameConfig::validate`] before use.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// How a frame is presented: one viewport, or a left/right pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Mono,
    #[default]
    Stereo,
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mono" => Ok(Self::Mono),
            "stereo" => Ok(Self::Stereo),
            other => Err(format!("unknown view mode `{other}` (expected mono or stereo)")),
        }
    }
}

/// Tunables of the runner simulation. Distances are world units, rates are
/// per simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub max_health: u32,
    pub damage_per_hit: u32,
    pub collision_radius: f32,
    pub spawn_interval_ticks: u64,
    pub spawn_depth: f32,
    pub despawn_depth: f32,
    pub obstacle_speed: f32,
    pub lane_half_width: f32,
    pub ground_y: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub steer_speed: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            damage_per_hit: 10,
            collision_radius: 1.0,
            spawn_interval_ticks: 60,
            spawn_depth: -60.0,
            despawn_depth: 10.0,
            obstacle_speed: 0.5,
            lane_half_width: 3.0,
            ground_y: 0.5,
            jump_velocity: 0.35,
            gravity: 0.02,
            steer_speed: 0.15,
        }
    }
}

impl RunnerConfig {
    /// Upper bound on simultaneously live obstacles.
    ///
    /// An obstacle lives for `(despawn - spawn) / speed` ticks and a new one
    /// appears every `spawn_interval_ticks`.
    pub fn max_live_obstacles(&self) -> usize {
        let lifetime = ((self.despawn_depth - self.spawn_depth) / self.obstacle_speed).ceil();
        (lifetime / self.spawn_interval_ticks as f32).ceil() as usize + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(invalid("runner.max_health", "must be positive"));
        }
        if self.spawn_interval_ticks == 0 {
            return Err(invalid("runner.spawn_interval_ticks", "must be positive"));
        }
        if self.obstacle_speed <= 0.0 {
            return Err(invalid("runner.obstacle_speed", "must be positive"));
        }
        if self.collision_radius <= 0.0 {
            return Err(invalid("runner.collision_radius", "must be positive"));
        }
        if self.gravity <= 0.0 {
            return Err(invalid("runner.gravity", "must be positive"));
        }
        if self.lane_half_width < 0.0 {
            return Err(invalid("runner.lane_half_width", "must not be negative"));
        }
        if self.despawn_depth <= self.spawn_depth {
            return Err(invalid("runner.despawn_depth", "must lie beyond spawn_depth"));
        }
        Ok(())
    }
}

/// Voxel sandbox settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub fov_degrees: f32,
    pub camera_position: [f32; 3],
    /// Radians of rotation per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Camera travel per wheel notch.
    pub zoom_step: f32,
    /// Edge length of the square ground plane.
    pub ground_size: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            camera_position: [0.0, 5.0, 10.0],
            look_sensitivity: 0.002,
            zoom_step: 0.5,
            ground_size: 100.0,
        }
    }
}

/// Window and frame pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub view_mode: ViewMode,
    pub tick_hz: f64,
    pub max_steps_per_frame: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            view_mode: ViewMode::Stereo,
            tick_hz: 60.0,
            max_steps_per_frame: 5,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub runner: RunnerConfig,
    pub sandbox: SandboxConfig,
    pub display: DisplayConfig,
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as a mapping.
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.runner.validate()?;
        if self.display.width == 0 || self.display.height == 0 {
            return Err(invalid("display", "width and height must be positive"));
        }
        if self.display.tick_hz <= 0.0 {
            return Err(invalid("display.tick_hz", "must be positive"));
        }
        if self.sandbox.zoom_step <= 0.0 {
            return Err(invalid("sandbox.zoom_step", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
