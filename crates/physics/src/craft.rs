//! Craft state: kinematics, resources, control state and outcome flags.

use std::fmt;

use engine_core::{Vec2, WorldConfig};
use procgen::TerrainModel;
use serde::{Deserialize, Serialize};

use crate::control::FlightParams;

/// Mass budget and starting conditions of the craft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    /// Mass without propellant (kg).
    pub dry_mass: f32,
    /// Propellant loaded at spawn (kg).
    pub initial_fuel: f32,
    /// Vertical velocity at spawn (m/s, negative is down).
    pub initial_vertical_speed: f32,
    /// Spawn height below the world ceiling (m).
    pub spawn_ceiling_margin: f32,
    /// Minimum gap between the craft and the terrain at spawn (m).
    pub spawn_clearance: f32,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            dry_mass: 8200.0,
            initial_fuel: 8200.0,
            initial_vertical_speed: -4.0,
            spawn_ceiling_margin: 10.0,
            spawn_clearance: 2.0,
        }
    }
}

/// Coarse flight outcome derived from the alive/landed flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightStatus {
    Airborne,
    Landed,
    Crashed,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightStatus::Airborne => "AIRBORNE",
            FlightStatus::Landed => "LANDED",
            FlightStatus::Crashed => "CRASHED",
        };
        f.write_str(s)
    }
}

/// Side jets that fired during the last tick.
///
/// A push to the left is produced by the starboard (right-hand) jet and a push
/// to the right by the port jet; renderers place the flame accordingly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideJets {
    pub port: bool,
    pub starboard: bool,
}

impl SideJets {
    pub fn any(&self) -> bool {
        self.port || self.starboard
    }
}

/// The vehicle being flown.
#[derive(Debug, Clone)]
pub struct CraftState {
    /// Center of the craft in meters, `y` measured from the world floor.
    pub position: Vec2,
    /// Velocity in m/s.
    pub velocity: Vec2,
    /// Attitude in degrees within `(-180, 180]`; 0 is nose up.
    pub angle: f32,
    /// Fraction of full main-engine thrust, `[0, 1]`.
    pub throttle: f32,
    /// Velocity the fly-by-wire law tracks.
    pub goal_velocity: Vec2,
    pub fly_by_wire: bool,
    pub fuel_mass: f32,
    pub dry_mass: f32,
    /// False once the craft has crashed. Terminal.
    pub alive: bool,
    pub landed: bool,
    /// Set while landed with enough throttle applied to take off again.
    pub liftoff_armed: bool,
    /// Rate of change of `velocity.y` over the last tick, for the HUD.
    pub vertical_accel: f32,
    /// `velocity.y` at the start of the last tick.
    pub prev_vy: f32,
    pub side_jets: SideJets,
}

impl CraftState {
    /// Craft at rest at `position` with the given propellant load.
    pub fn new(position: Vec2, dry_mass: f32, fuel_mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            throttle: 0.0,
            goal_velocity: Vec2::ZERO,
            fly_by_wire: false,
            fuel_mass: fuel_mass.max(0.0),
            dry_mass,
            alive: true,
            landed: false,
            liftoff_armed: false,
            vertical_accel: 0.0,
            prev_vy: 0.0,
            side_jets: SideJets::default(),
        }
    }

    /// Spawn descending over the middle of the world, clear of the terrain,
    /// with the throttle at the hover setting.
    pub fn spawn(
        config: &CraftConfig,
        params: &FlightParams,
        world: &WorldConfig,
        terrain: &TerrainModel,
    ) -> Self {
        let x = world.width_m / 2.0;
        let ground = terrain.height_under(x).unwrap_or(0.0);
        let y = (world.height_m - config.spawn_ceiling_margin)
            .max(ground + world.craft_height_m + config.spawn_clearance)
            .min(world.height_m - world.craft_half_height());

        let mut craft = Self::new(Vec2::new(x, y), config.dry_mass, config.initial_fuel);
        craft.velocity.y = config.initial_vertical_speed;
        craft.prev_vy = craft.velocity.y;
        craft.throttle = params.hover_throttle(craft.total_mass());
        log::debug!(
            "Spawned craft at ({:.1}, {:.1}) with {:.0} kg fuel, throttle {:.2}",
            x,
            y,
            craft.fuel_mass,
            craft.throttle
        );
        craft
    }

    pub fn total_mass(&self) -> f32 {
        self.dry_mass + self.fuel_mass
    }

    pub fn has_fuel(&self) -> bool {
        self.fuel_mass > 0.0
    }

    /// Remove propellant, flooring at empty.
    pub fn burn_fuel(&mut self, amount: f32) {
        self.fuel_mass = (self.fuel_mass - amount).max(0.0);
    }

    /// Set the throttle, clamped to `[0, 1]`.
    pub fn set_throttle(&mut self, throttle: f32) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    pub fn status(&self) -> FlightStatus {
        if !self.alive {
            FlightStatus::Crashed
        } else if self.landed {
            FlightStatus::Landed
        } else {
            FlightStatus::Airborne
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_terrain(height: f32) -> TerrainModel {
        TerrainModel::from_heights(vec![height; 4800], vec![2400], 100, 750.0).unwrap()
    }

    #[test]
    fn spawn_matches_defaults() {
        let world = WorldConfig::default();
        let params = FlightParams::default();
        let craft = CraftState::spawn(
            &CraftConfig::default(),
            &params,
            &world,
            &flat_terrain(10.0),
        );

        assert_eq!(craft.position, Vec2::new(375.0, 140.0));
        assert_eq!(craft.velocity, Vec2::new(0.0, -4.0));
        assert_eq!(craft.total_mass(), 16400.0);
        // Hover throttle: 1.62 * 16400 / 44000
        assert!((craft.throttle - 0.6038).abs() < 1e-3);
        assert_eq!(craft.status(), FlightStatus::Airborne);
    }

    #[test]
    fn spawn_clears_tall_terrain_and_stays_inside_world() {
        let world = WorldConfig::default();
        let params = FlightParams::default();

        let craft = CraftState::spawn(&CraftConfig::default(), &params, &world, &flat_terrain(135.0));
        assert_eq!(craft.position.y, 142.0);

        let craft = CraftState::spawn(&CraftConfig::default(), &params, &world, &flat_terrain(146.0));
        assert_eq!(craft.position.y, 147.5);
    }

    #[test]
    fn fuel_and_throttle_clamp() {
        let mut craft = CraftState::new(Vec2::ZERO, 100.0, 5.0);
        craft.burn_fuel(8.0);
        assert_eq!(craft.fuel_mass, 0.0);
        assert!(!craft.has_fuel());

        craft.set_throttle(1.7);
        assert_eq!(craft.throttle, 1.0);
        craft.set_throttle(-0.2);
        assert_eq!(craft.throttle, 0.0);
    }

    #[test]
    fn status_follows_flags() {
        let mut craft = CraftState::new(Vec2::ZERO, 100.0, 5.0);
        craft.landed = true;
        assert_eq!(craft.status(), FlightStatus::Landed);
        craft.alive = false;
        assert_eq!(craft.status(), FlightStatus::Crashed);
        assert_eq!(craft.status().to_string(), "CRASHED");
    }
}
