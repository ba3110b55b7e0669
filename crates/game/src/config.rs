//! Lander configuration. Loaded from lander.ron at startup.

use engine_core::{WorldConfig, DEFAULT_FIXED_RATE_HZ};
use physics::{CraftConfig, FlightParams, LandingRules, SessionConfig};
use procgen::TerrainConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent lander settings. Loaded from `lander.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanderConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Physics tick rate.
    #[serde(default = "default_physics_rate")]
    pub physics_rate_hz: f64,
    /// Most physics ticks run per frame after a stall.
    #[serde(default = "default_max_catch_up_steps")]
    pub max_catch_up_steps: u32,
    /// Fly-by-wire goal change per frame a key is held (m/s).
    #[serde(default = "default_goal_increment")]
    pub goal_increment: f32,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub craft: CraftConfig,
    #[serde(default)]
    pub flight: FlightParams,
    #[serde(default)]
    pub landing: LandingRules,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_physics_rate() -> f64 {
    DEFAULT_FIXED_RATE_HZ
}
fn default_max_catch_up_steps() -> u32 {
    8
}
fn default_goal_increment() -> f32 {
    0.1
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            physics_rate_hz: default_physics_rate(),
            max_catch_up_steps: default_max_catch_up_steps(),
            goal_increment: default_goal_increment(),
            world: WorldConfig::default(),
            terrain: TerrainConfig::default(),
            craft: CraftConfig::default(),
            flight: FlightParams::default(),
            landing: LandingRules::default(),
        }
    }
}

impl LanderConfig {
    /// Load config from `lander.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::from_ron(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    return c;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `lander.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Settings for one flight session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            world: self.world,
            craft: self.craft,
            flight: self.flight,
            landing: self.landing,
            physics_rate_hz: self.physics_rate_hz,
            max_catch_up_steps: self.max_catch_up_steps,
            goal_increment: self.goal_increment,
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("lander.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = LanderConfig::from_ron("(physics_rate_hz: 120.0, terrain: (seed: Some(7)))").unwrap();
        assert_eq!(config.physics_rate_hz, 120.0);
        assert_eq!(config.terrain.seed, Some(7));
        assert_eq!(config.terrain.samples, 4800);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.flight, FlightParams::default());
    }

    #[test]
    fn pretty_output_reads_back() {
        let mut config = LanderConfig::default();
        config.craft.initial_fuel = 4000.0;
        config.landing.angle_tolerance_deg = 5.0;
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back = LanderConfig::from_ron(&text).unwrap();
        assert_eq!(back.craft.initial_fuel, 4000.0);
        assert_eq!(back.landing.angle_tolerance_deg, 5.0);
    }

    #[test]
    fn invalid_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("lander-invalid-{}.ron", std::process::id()));
        std::fs::write(&path, "(window_width: \"wide\")").unwrap();
        let config = LanderConfig::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config.window_width, 1280);

        let missing = LanderConfig::load_from(Path::new("/nonexistent/lander.ron"));
        assert_eq!(missing.max_catch_up_steps, 8);
    }

    #[test]
    fn session_config_carries_settings() {
        let mut config = LanderConfig::default();
        config.goal_increment = 0.25;
        config.flight.gravity = 3.7;
        let session = config.session_config();
        assert_eq!(session.goal_increment, 0.25);
        assert_eq!(session.flight.gravity, 3.7);
        assert_eq!(session.physics_rate_hz, 60.0);
    }
}
