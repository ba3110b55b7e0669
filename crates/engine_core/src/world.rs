//! World and craft dimensions shared by terrain, physics and the front end.

use serde::{Deserialize, Serialize};

/// Metric extent of the world and of the craft flying in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal extent of the world in meters.
    pub width_m: f32,
    /// Vertical extent of the world in meters, measured from the floor.
    pub height_m: f32,
    /// Craft footprint width in meters.
    pub craft_width_m: f32,
    /// Craft height in meters.
    pub craft_height_m: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width_m: 750.0,
            height_m: 150.0,
            craft_width_m: 5.0,
            craft_height_m: 5.0,
        }
    }
}

impl WorldConfig {
    /// Distance from the craft's center to its landing gear.
    pub fn craft_half_height(&self) -> f32 {
        self.craft_height_m / 2.0
    }
}
