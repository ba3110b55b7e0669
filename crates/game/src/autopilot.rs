//! Scripted pilot for headless runs.
//!
//! Flies through the same [`ControlIntent`] surface as the keyboard: it
//! engages fly-by-wire and then only nudges the goal velocities, steering
//! toward the nearest pad before descending onto it.

use std::time::Duration;

use engine_core::ControlIntent;
use physics::{FlightSession, FlightStatus, Telemetry};
use procgen::TerrainModel;

/// Give up after this much simulated time.
const TIME_LIMIT: Duration = Duration::from_secs(600);

/// Headroom kept over terrain while traversing (m).
const CRUISE_CLEARANCE: f32 = 15.0;

/// Distance from the pad center within which the descent starts (m).
const CAPTURE_RADIUS: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Half the goal increment: goals within this of the target are left alone.
    tolerance: f32,
    max_lateral_speed: f32,
    max_descent_speed: f32,
    touchdown_speed: f32,
}

impl Autopilot {
    pub fn new(goal_increment: f32) -> Self {
        Self {
            tolerance: goal_increment * 0.5,
            max_lateral_speed: 3.0,
            max_descent_speed: 4.0,
            touchdown_speed: 0.8,
        }
    }

    /// Velocity the pilot wants given the current state.
    pub fn target_velocity(&self, t: &Telemetry, pad_x: f32) -> (f32, f32) {
        let dx = pad_x - t.position.x;
        let altitude = t.altitude.unwrap_or(f32::MAX);

        let vx = if dx.abs() < 1.0 {
            0.0
        } else {
            (dx * 0.1).clamp(-self.max_lateral_speed, self.max_lateral_speed)
        };

        let vy = if dx.abs() > CAPTURE_RADIUS || t.velocity.x.abs() > 0.5 {
            if altitude < CRUISE_CLEARANCE {
                1.0
            } else {
                0.0
            }
        } else {
            -(altitude * 0.1).clamp(self.touchdown_speed, self.max_descent_speed)
        };
        (vx, vy)
    }

    /// This frame's intent.
    pub fn intent(&self, t: &Telemetry, pad_x: f32) -> ControlIntent {
        if !t.fly_by_wire {
            return ControlIntent {
                toggle_fly_by_wire: true,
                ..ControlIntent::IDLE
            };
        }
        let (vx, vy) = self.target_velocity(t, pad_x);
        let goal = t.goal_velocity;
        ControlIntent {
            thrust_up: goal.y < vy - self.tolerance,
            thrust_down: goal.y > vy + self.tolerance,
            rotate_left: goal.x > vx + self.tolerance,
            rotate_right: goal.x < vx - self.tolerance,
            ..ControlIntent::IDLE
        }
    }
}

fn target_pad(terrain: &TerrainModel, x: f32) -> f32 {
    terrain.nearest_pad_x(x).unwrap_or(x)
}

/// Fly a session to completion without a window.
pub fn run_headless(session: &mut FlightSession, goal_increment: f32) -> FlightStatus {
    let pilot = Autopilot::new(goal_increment);
    let frame = session.time().fixed_timestep();
    let pad_x = target_pad(session.terrain(), session.craft().position.x);
    log::info!("Autopilot targeting pad at x={:.1} m", pad_x);

    let mut next_report = Duration::ZERO;
    while session.time().elapsed() < TIME_LIMIT {
        let telemetry = session.telemetry();
        if telemetry.elapsed >= next_report {
            log::info!("{}", telemetry);
            next_report += Duration::from_secs(1);
        }

        let intent = pilot.intent(&telemetry, pad_x);
        let report = session.frame(&intent, frame);
        if report.status != FlightStatus::Airborne {
            log::info!("{}", session.telemetry());
            return report.status;
        }
    }

    log::warn!("Autopilot gave up after {:?}", TIME_LIMIT);
    session.status()
}
