//! Flight control laws and the shared integration step.
//!
//! Both laws reduce to an [`ActuationIntent`] for the tick: the manual law
//! takes it from the operator, fly-by-wire synthesizes it from velocity error.
//! Main engine, side jets, gravity and the Euler update then run through one
//! code path regardless of law.

use engine_core::{normalize_degrees, ControlIntent, Vec2};
use serde::{Deserialize, Serialize};

use crate::craft::{CraftState, SideJets};

/// Physical constants and controller gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParams {
    /// Gravitational acceleration (m/s², lunar by default).
    pub gravity: f32,
    /// Main engine thrust at full throttle (N).
    pub engine_thrust: f32,
    /// Propellant flow at full throttle (kg/s).
    pub fuel_burn_rate: f32,
    /// Lateral acceleration of one side jet (m/s²).
    pub side_thrust: f32,
    /// Manual rotation rate (deg/s).
    pub rotate_speed: f32,
    /// Manual throttle slew rate (fraction per second).
    pub throttle_change_rate: f32,
    /// Fly-by-wire vertical gain.
    pub vertical_gain: f32,
    /// Fly-by-wire attitude gain.
    pub attitude_gain: f32,
    /// Horizontal velocity error below which side jets stay off (m/s).
    pub lateral_deadband: f32,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            gravity: 1.62,
            engine_thrust: 44_000.0,
            fuel_burn_rate: 14.5,
            side_thrust: 2.5,
            rotate_speed: 20.0,
            throttle_change_rate: 0.5,
            vertical_gain: 2.0,
            attitude_gain: 0.2,
            lateral_deadband: 0.2,
        }
    }
}

impl FlightParams {
    /// Throttle that balances gravity for a craft of `mass` kg, clamped to `[0, 1]`.
    pub fn hover_throttle(&self, mass: f32) -> f32 {
        (self.gravity * mass / self.engine_thrust).clamp(0.0, 1.0)
    }
}

/// Which control law drives the craft this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLaw {
    /// Operator keys map straight onto throttle, attitude and side jets.
    Manual,
    /// Throttle, attitude and side jets track the goal velocities.
    FlyByWire,
}

impl ControlLaw {
    pub fn for_craft(craft: &CraftState) -> Self {
        if craft.fly_by_wire {
            ControlLaw::FlyByWire
        } else {
            ControlLaw::Manual
        }
    }
}

/// Actuator commands for a single tick.
///
/// Rotation keys double as side-jet keys: with `side_thrust` set they fire the
/// jets instead of turning the craft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuationIntent {
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub side_thrust: bool,
}

impl From<&ControlIntent> for ActuationIntent {
    fn from(intent: &ControlIntent) -> Self {
        Self {
            thrust_up: intent.thrust_up,
            thrust_down: intent.thrust_down,
            rotate_left: intent.rotate_left,
            rotate_right: intent.rotate_right,
            side_thrust: intent.side_thrust,
        }
    }
}

/// Advances craft kinematics one fixed tick at a time.
#[derive(Debug, Clone, Default)]
pub struct FlightController {
    params: FlightParams,
}

impl FlightController {
    pub fn new(params: FlightParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FlightParams {
        &self.params
    }

    /// Run one tick under `law`. A crashed craft is left untouched.
    pub fn step(&self, craft: &mut CraftState, law: ControlLaw, intent: &ActuationIntent, dt: f32) {
        match law {
            ControlLaw::Manual => self.advance(craft, intent, dt),
            ControlLaw::FlyByWire => self.flybywire(craft, dt),
        }
    }

    /// Manual law: throttle slews with up/down, left/right rotate the craft
    /// unless side thrust is held, in which case they fire the side jets.
    pub fn advance(&self, craft: &mut CraftState, intent: &ActuationIntent, dt: f32) {
        if !craft.alive {
            return;
        }
        debug_assert!(dt > 0.0, "tick length must be positive");

        let throttle_delta = self.params.throttle_change_rate * dt;
        if intent.thrust_up {
            craft.throttle += throttle_delta;
        }
        if intent.thrust_down {
            craft.throttle -= throttle_delta;
        }
        craft.set_throttle(craft.throttle);

        if !intent.side_thrust {
            let rotation = self.params.rotate_speed * dt;
            if intent.rotate_left {
                craft.angle -= rotation;
            }
            if intent.rotate_right {
                craft.angle += rotation;
            }
        }
        craft.angle = normalize_degrees(craft.angle);

        self.integrate(craft, intent, dt);
    }

    /// Fly-by-wire law: proportional control toward the goal velocities and
    /// an upright attitude. The operator only moves the goals.
    pub fn flybywire(&self, craft: &mut CraftState, dt: f32) {
        if !craft.alive {
            return;
        }
        debug_assert!(dt > 0.0, "tick length must be positive");
        let p = &self.params;

        // Gain grows with the error: fast correction far away, gentle near the goal.
        let vy_error = craft.goal_velocity.y - craft.velocity.y;
        let gain = p.vertical_gain * (1.0 + vy_error.abs());
        craft.set_throttle(craft.throttle + gain * vy_error * dt);

        let vx_error = craft.goal_velocity.x - craft.velocity.x;
        let fuelled = craft.has_fuel();
        let synthetic = ActuationIntent {
            rotate_left: fuelled && vx_error < -p.lateral_deadband,
            rotate_right: fuelled && vx_error > p.lateral_deadband,
            side_thrust: true,
            ..ActuationIntent::default()
        };

        craft.angle += p.attitude_gain * (0.0 - craft.angle) * dt;
        craft.angle = normalize_degrees(craft.angle);

        self.integrate(craft, &synthetic, dt);
    }

    /// Engines, gravity and the Euler position update shared by both laws.
    fn integrate(&self, craft: &mut CraftState, actuation: &ActuationIntent, dt: f32) {
        let p = &self.params;
        let prev_vy = craft.velocity.y;

        if craft.throttle > 0.0 && craft.has_fuel() {
            let heading = craft.angle.to_radians();
            let accel = p.engine_thrust * craft.throttle / craft.total_mass();
            craft.velocity += Vec2::new(heading.sin(), heading.cos()) * accel * dt;
            craft.burn_fuel(p.fuel_burn_rate * craft.throttle * dt);
        }

        craft.side_jets = SideJets::default();
        if actuation.side_thrust && craft.has_fuel() {
            let jet_burn = 0.5 * p.fuel_burn_rate * dt;
            if actuation.rotate_left {
                craft.velocity.x -= p.side_thrust * dt;
                craft.burn_fuel(jet_burn);
                craft.side_jets.starboard = true;
            }
            if actuation.rotate_right {
                craft.velocity.x += p.side_thrust * dt;
                craft.burn_fuel(jet_burn);
                craft.side_jets.port = true;
            }
        }

        craft.velocity.y -= p.gravity * dt;
        craft.position += craft.velocity * dt;

        craft.vertical_accel = (craft.velocity.y - prev_vy) / dt;
        craft.prev_vy = prev_vy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn craft() -> CraftState {
        CraftState::new(Vec2::new(375.0, 100.0), 8200.0, 8200.0)
    }

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn free_fall_applies_gravity_only() {
        let controller = FlightController::default();
        let mut c = craft();
        controller.advance(&mut c, &ActuationIntent::default(), DT);

        assert!(approx(c.velocity.y, -1.62 * DT, 1e-6));
        assert!(approx(c.position.y, 100.0 - 1.62 * DT * DT, 1e-4));
        assert_eq!(c.velocity.x, 0.0);
        assert_eq!(c.fuel_mass, 8200.0);
        assert!(approx(c.vertical_accel, -1.62, 1e-3));
    }

    #[test]
    fn throttle_ramps_and_clamps() {
        let controller = FlightController::default();
        let mut c = craft();
        let up = ActuationIntent {
            thrust_up: true,
            ..Default::default()
        };
        controller.advance(&mut c, &up, 1.0);
        assert!(approx(c.throttle, 0.5, 1e-6));
        for _ in 0..5 {
            controller.advance(&mut c, &up, 1.0);
            assert!((0.0..=1.0).contains(&c.throttle));
        }
        assert_eq!(c.throttle, 1.0);

        let down = ActuationIntent {
            thrust_down: true,
            ..Default::default()
        };
        for _ in 0..5 {
            controller.advance(&mut c, &down, 1.0);
        }
        assert_eq!(c.throttle, 0.0);
    }

    #[test]
    fn main_engine_follows_nose_and_burns_fuel() {
        let controller = FlightController::default();
        let mut c = craft();
        c.throttle = 1.0;
        c.angle = 90.0;
        controller.advance(&mut c, &ActuationIntent::default(), DT);

        let accel = 44_000.0 / 16_400.0;
        assert!(approx(c.velocity.x, accel * DT, 1e-5));
        assert!(approx(c.velocity.y, -1.62 * DT, 1e-5));
        assert!(approx(c.fuel_mass, 8200.0 - 14.5 * DT, 2e-3));
    }

    #[test]
    fn rotation_is_suppressed_while_side_thrust_held() {
        let controller = FlightController::default();
        let mut c = craft();
        let left = ActuationIntent {
            rotate_left: true,
            ..Default::default()
        };
        controller.advance(&mut c, &left, 0.5);
        assert!(approx(c.angle, -10.0, 1e-5));

        let mut c = craft();
        let jets = ActuationIntent {
            rotate_left: true,
            side_thrust: true,
            ..Default::default()
        };
        controller.advance(&mut c, &jets, 0.5);
        assert_eq!(c.angle, 0.0);
        assert!(approx(c.velocity.x, -1.25, 1e-5));
        assert!(approx(c.fuel_mass, 8200.0 - 0.5 * 14.5 * 0.5, 2e-3));
        assert!(c.side_jets.starboard);
        assert!(!c.side_jets.port);
    }

    #[test]
    fn angle_stays_normalized() {
        let controller = FlightController::default();
        let mut c = craft();
        c.angle = 175.0;
        let right = ActuationIntent {
            rotate_right: true,
            ..Default::default()
        };
        controller.advance(&mut c, &right, 0.5);
        assert!(approx(c.angle, -175.0, 1e-4));
    }

    #[test]
    fn empty_tank_disables_engines() {
        let controller = FlightController::default();
        let mut c = CraftState::new(Vec2::new(0.0, 50.0), 8200.0, 0.01);
        c.throttle = 1.0;
        let jets = ActuationIntent {
            rotate_right: true,
            side_thrust: true,
            ..Default::default()
        };
        for _ in 0..10 {
            controller.advance(&mut c, &jets, DT);
            assert!(c.fuel_mass >= 0.0);
            assert!((0.0..=1.0).contains(&c.throttle));
        }
        assert_eq!(c.fuel_mass, 0.0);

        let vx = c.velocity.x;
        let vy = c.velocity.y;
        controller.advance(&mut c, &jets, DT);
        assert_eq!(c.velocity.x, vx);
        assert!(approx(c.velocity.y, vy - 1.62 * DT, 1e-6));
        assert!(!c.side_jets.any());
    }

    #[test]
    fn flybywire_empty_tank_fires_no_jets() {
        let controller = FlightController::default();
        let mut c = CraftState::new(Vec2::new(0.0, 50.0), 8200.0, 0.0);
        c.goal_velocity.x = 3.0;
        controller.flybywire(&mut c, DT);

        assert!(!c.side_jets.any());
        assert_eq!(c.velocity.x, 0.0);
        assert_eq!(c.fuel_mass, 0.0);
        assert!(approx(c.velocity.y, -1.62 * DT, 1e-6));

        c.goal_velocity.x = -3.0;
        controller.flybywire(&mut c, DT);
        assert!(!c.side_jets.any());
        assert_eq!(c.velocity.x, 0.0);
    }

    #[test]
    fn crashed_craft_is_not_advanced() {
        let controller = FlightController::default();
        let mut c = craft();
        c.alive = false;
        c.throttle = 1.0;
        c.velocity = Vec2::new(3.0, -5.0);
        let before = c.clone();
        let intent = ActuationIntent {
            thrust_up: true,
            rotate_left: true,
            ..Default::default()
        };
        controller.advance(&mut c, &intent, DT);
        controller.flybywire(&mut c, DT);
        assert_eq!(c.position, before.position);
        assert_eq!(c.velocity, before.velocity);
        assert_eq!(c.angle, before.angle);
        assert_eq!(c.fuel_mass, before.fuel_mass);
        assert_eq!(c.throttle, before.throttle);
    }

    #[test]
    fn flybywire_arrests_descent() {
        let controller = FlightController::default();
        let mut c = craft();
        c.fly_by_wire = true;
        c.velocity.y = -4.0;
        c.throttle = FlightParams::default().hover_throttle(c.total_mass());

        // The climb toward the goal is monotonic until the first crossing.
        let mut ticks = 0;
        let mut last_vy = c.velocity.y;
        while c.velocity.y < -0.05 {
            controller.step(&mut c, ControlLaw::FlyByWire, &ActuationIntent::default(), DT);
            assert!(c.velocity.y >= last_vy, "vy fell back at tick {}", ticks);
            last_vy = c.velocity.y;
            ticks += 1;
            assert!(ticks < 600, "descent not arrested within 10 s");
        }

        // Afterwards the residual oscillation stays bounded.
        for _ in 0..1200 {
            controller.step(&mut c, ControlLaw::FlyByWire, &ActuationIntent::default(), DT);
            assert!(c.velocity.y.abs() < 0.75, "vy {} escaped the bound", c.velocity.y);
            assert!((0.0..=1.0).contains(&c.throttle));
        }
    }

    #[test]
    fn flybywire_side_jets_use_deadband() {
        let controller = FlightController::default();

        let mut c = craft();
        c.goal_velocity.x = 1.0;
        controller.flybywire(&mut c, DT);
        assert!(c.side_jets.port);
        assert!(c.velocity.x > 0.0);

        let mut c = craft();
        c.goal_velocity.x = -1.0;
        controller.flybywire(&mut c, DT);
        assert!(c.side_jets.starboard);
        assert!(c.velocity.x < 0.0);

        let mut c = craft();
        c.goal_velocity.x = 0.15;
        controller.flybywire(&mut c, DT);
        assert!(!c.side_jets.any());
        assert_eq!(c.velocity.x, 0.0);
    }

    #[test]
    fn flybywire_levels_attitude() {
        let controller = FlightController::default();
        let mut c = craft();
        c.angle = 30.0;
        controller.flybywire(&mut c, 1.0);
        assert!(approx(c.angle, 24.0, 1e-4));
        for _ in 0..600 {
            controller.flybywire(&mut c, DT);
        }
        assert!(c.angle.abs() < 30.0 * (-2.0_f32).exp() + 1e-3);
    }

    #[test]
    fn control_law_follows_mode_flag() {
        let mut c = craft();
        assert_eq!(ControlLaw::for_craft(&c), ControlLaw::Manual);
        c.fly_by_wire = true;
        assert_eq!(ControlLaw::for_craft(&c), ControlLaw::FlyByWire);
    }
}
