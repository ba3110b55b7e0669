//! One flight: terrain, craft and the fixed-step loop that drives them.
//!
//! The caller feeds a [`ControlIntent`] and the wall time elapsed since the
//! previous frame. The intent is held for every tick drained that frame and
//! each tick runs control integration before contact evaluation.

use std::fmt;
use std::time::Duration;

use engine_core::{ControlIntent, Time, TimeError, Vec2, WorldConfig, DEFAULT_FIXED_RATE_HZ};
use procgen::TerrainModel;

use crate::control::{ActuationIntent, ControlLaw, FlightController, FlightParams};
use crate::craft::{CraftConfig, CraftState, FlightStatus, SideJets};
use crate::landing::{LandingEvaluator, LandingEvent, LandingRules};

/// Everything a session needs besides the terrain.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub world: WorldConfig,
    pub craft: CraftConfig,
    pub flight: FlightParams,
    pub landing: LandingRules,
    pub physics_rate_hz: f64,
    /// Most ticks run in one frame; older backlog is dropped.
    pub max_catch_up_steps: u32,
    /// Goal velocity change per frame a key is held under fly-by-wire (m/s).
    pub goal_increment: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            craft: CraftConfig::default(),
            flight: FlightParams::default(),
            landing: LandingRules::default(),
            physics_rate_hz: DEFAULT_FIXED_RATE_HZ,
            max_catch_up_steps: 8,
            goal_increment: 0.1,
        }
    }
}

/// What happened during one call to [`FlightSession::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Fixed ticks run this frame.
    pub ticks: u32,
    /// Ticks dropped because the catch-up cap was reached.
    pub dropped: u32,
    pub status: FlightStatus,
    pub events: Vec<LandingEvent>,
}

impl FrameReport {
    /// Whether the flight outcome changed during this frame.
    pub fn outcome_changed(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Read-only snapshot for renderers and the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub throttle: f32,
    pub fuel_mass: f32,
    pub goal_velocity: Vec2,
    pub fly_by_wire: bool,
    pub status: FlightStatus,
    pub liftoff_armed: bool,
    pub vertical_accel: f32,
    pub side_jets: SideJets,
    /// Height of the landing gear above the terrain under the craft.
    pub altitude: Option<f32>,
    pub elapsed: Duration,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.altitude {
            Some(alt) => write!(f, "ALT {:6.1} m", alt)?,
            None => write!(f, "ALT   ---- m")?,
        }
        write!(
            f,
            " | VX {:+5.2} VY {:+5.2} AY {:+5.2} | ANG {:+6.1} | THR {:3.0}% | FUEL {:5.0} kg",
            self.velocity.x,
            self.velocity.y,
            self.vertical_accel,
            self.angle,
            self.throttle * 100.0,
            self.fuel_mass,
        )?;
        if self.fly_by_wire {
            write!(
                f,
                " | FBW goal ({:+.1}, {:+.1})",
                self.goal_velocity.x, self.goal_velocity.y
            )?;
        } else {
            write!(f, " | MAN")?;
        }
        write!(f, " | {}", self.status)?;
        if self.liftoff_armed {
            write!(f, " ARMED")?;
        }
        Ok(())
    }
}

pub struct FlightSession {
    terrain: TerrainModel,
    craft: CraftState,
    controller: FlightController,
    evaluator: LandingEvaluator,
    time: Time,
    world: WorldConfig,
    max_catch_up_steps: u32,
    goal_increment: f32,
}

impl FlightSession {
    /// Spawn a fresh craft over `terrain`.
    pub fn new(config: &SessionConfig, terrain: TerrainModel) -> Result<Self, TimeError> {
        let time = Time::with_fixed_rate(config.physics_rate_hz)?;
        let craft = CraftState::spawn(&config.craft, &config.flight, &config.world, &terrain);
        log::info!(
            "Flight session started: {} terrain samples, {} pads, {} Hz physics",
            terrain.len(),
            terrain.pad_centers().len(),
            config.physics_rate_hz
        );
        Ok(Self {
            terrain,
            craft,
            controller: FlightController::new(config.flight),
            evaluator: LandingEvaluator::new(config.landing, config.world.craft_half_height()),
            time,
            world: config.world,
            max_catch_up_steps: config.max_catch_up_steps.max(1),
            goal_increment: config.goal_increment,
        })
    }

    /// Advance the simulation by one rendered frame.
    pub fn frame(&mut self, intent: &ControlIntent, elapsed: Duration) -> FrameReport {
        if intent.toggle_fly_by_wire && self.craft.alive {
            self.craft.fly_by_wire = !self.craft.fly_by_wire;
            if self.craft.fly_by_wire {
                self.craft.goal_velocity = self.craft.velocity;
            }
            log::info!(
                "Fly-by-wire {}",
                if self.craft.fly_by_wire { "engaged" } else { "disengaged" }
            );
        }
        if self.craft.fly_by_wire && self.craft.alive {
            self.adjust_goals(intent);
        }

        let actuation = ActuationIntent::from(intent);
        let mut events = Vec::new();
        let mut ticks = 0;
        self.time.advance(elapsed);
        while ticks < self.max_catch_up_steps && self.time.should_fixed_update() {
            if let Some(event) = self.tick(&actuation) {
                events.push(event);
            }
            ticks += 1;
        }

        let dropped = if ticks == self.max_catch_up_steps {
            self.time.discard_backlog()
        } else {
            0
        };
        if dropped > 0 {
            log::warn!("Simulation fell behind, dropped {} ticks", dropped);
        }

        // Manual flight keeps goals on the actual velocity so engaging
        // fly-by-wire holds it.
        if !self.craft.fly_by_wire {
            self.craft.goal_velocity = self.craft.velocity;
        }

        FrameReport {
            ticks,
            dropped,
            status: self.craft.status(),
            events,
        }
    }

    fn adjust_goals(&mut self, intent: &ControlIntent) {
        let step = self.goal_increment;
        let goal = &mut self.craft.goal_velocity;
        if intent.thrust_up {
            goal.y += step;
        }
        if intent.thrust_down {
            goal.y -= step;
        }
        if intent.rotate_left {
            goal.x -= step;
        }
        if intent.rotate_right {
            goal.x += step;
        }
    }

    /// One fixed tick: integrate under the active law, then resolve contact.
    fn tick(&mut self, actuation: &ActuationIntent) -> Option<LandingEvent> {
        if !self.craft.alive {
            return None;
        }
        let dt = self.time.fixed_timestep_seconds();
        let law = ControlLaw::for_craft(&self.craft);
        self.controller.step(&mut self.craft, law, actuation, dt);
        let event = self.evaluator.evaluate(&mut self.craft, &self.terrain)?;
        match event {
            LandingEvent::Touchdown { impact } => log::info!(
                "Touchdown at x={:.1} m, impact ({:.2}, {:.2}) m/s, {:.0} kg fuel left",
                self.craft.position.x,
                impact.x,
                impact.y,
                self.craft.fuel_mass
            ),
            LandingEvent::Liftoff => log::info!("Liftoff"),
            LandingEvent::Crashed { impact, angle, on_pad } => log::info!(
                "Crashed at x={:.1} m (on pad: {}, angle {:.1}, impact ({:.2}, {:.2}) m/s)",
                self.craft.position.x,
                on_pad,
                angle,
                impact.x,
                impact.y
            ),
        }
        Some(event)
    }

    pub fn craft(&self) -> &CraftState {
        &self.craft
    }

    /// Mutable craft access for scripted scenarios.
    pub fn craft_mut(&mut self) -> &mut CraftState {
        &mut self.craft
    }

    pub fn terrain(&self) -> &TerrainModel {
        &self.terrain
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn controller(&self) -> &FlightController {
        &self.controller
    }

    pub fn status(&self) -> FlightStatus {
        self.craft.status()
    }

    /// Landing-gear height above the terrain sample under the craft.
    pub fn altitude(&self) -> Option<f32> {
        let ground = self.terrain.height_under(self.craft.position.x)?;
        Some(self.craft.position.y - self.world.craft_half_height() - ground)
    }

    pub fn telemetry(&self) -> Telemetry {
        let c = &self.craft;
        Telemetry {
            position: c.position,
            velocity: c.velocity,
            angle: c.angle,
            throttle: c.throttle,
            fuel_mass: c.fuel_mass,
            goal_velocity: c.goal_velocity,
            fly_by_wire: c.fly_by_wire,
            status: c.status(),
            liftoff_armed: c.liftoff_armed,
            vertical_accel: c.vertical_accel,
            side_jets: c.side_jets,
            altitude: self.altitude(),
            elapsed: self.time.elapsed(),
        }
    }
}
