//! Contact resolution and the airborne / landed / crashed state machine.
//!
//! Runs after every integration step. Contact is a hard stop: the craft is
//! placed on the surface and its velocity zeroed, with no restitution.
//! Whether the craft came down on the next tick's integrated position is what
//! decides liftoff, so a craft resting on a pad does not flicker between states.

use engine_core::Vec2;
use procgen::TerrainModel;
use serde::{Deserialize, Serialize};

use crate::craft::CraftState;

/// Tolerances for a survivable touchdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingRules {
    /// Largest tilt from vertical, exclusive (deg).
    pub angle_tolerance_deg: f32,
    /// Largest horizontal impact speed, exclusive (m/s).
    pub vx_tolerance: f32,
    /// Largest vertical impact speed, exclusive (m/s).
    pub vy_tolerance: f32,
    /// Throttle above which a landed craft is armed for liftoff.
    pub liftoff_throttle: f32,
}

impl Default for LandingRules {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: 10.0,
            vx_tolerance: 2.0,
            vy_tolerance: 2.0,
            liftoff_throttle: 0.1,
        }
    }
}

/// Outcome transitions reported by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandingEvent {
    /// First contact within tolerances on a pad.
    Touchdown { impact: Vec2 },
    /// A landed craft rose clear of the surface.
    Liftoff,
    /// Contact off a pad or outside tolerances. Terminal.
    Crashed { impact: Vec2, angle: f32, on_pad: bool },
}

#[derive(Debug, Clone)]
pub struct LandingEvaluator {
    rules: LandingRules,
    /// Distance from the craft's center to its landing gear.
    half_height: f32,
}

impl LandingEvaluator {
    pub fn new(rules: LandingRules, half_height: f32) -> Self {
        Self { rules, half_height }
    }

    /// Whether a touchdown with this attitude and impact velocity is survivable.
    pub fn is_good_touchdown(&self, on_pad: bool, angle: f32, impact: Vec2) -> bool {
        on_pad
            && angle.abs() < self.rules.angle_tolerance_deg
            && impact.x.abs() < self.rules.vx_tolerance
            && impact.y.abs() < self.rules.vy_tolerance
    }

    /// Resolve contact for the craft's current position.
    ///
    /// Outside the heightmap nothing happens; the craft simply flies on.
    pub fn evaluate(&self, craft: &mut CraftState, terrain: &TerrainModel) -> Option<LandingEvent> {
        if !craft.alive {
            return None;
        }
        let tx = terrain.sample_index(craft.position.x)?;
        let ground = terrain.height_at(tx)?;

        // Gear exactly at ground level counts as clear, so a landed craft
        // whose tick ended level with the surface lifts off.
        if craft.position.y - self.half_height >= ground {
            if craft.landed {
                craft.landed = false;
                craft.liftoff_armed = false;
                log::debug!("Liftoff at x={:.1}", craft.position.x);
                return Some(LandingEvent::Liftoff);
            }
            return None;
        }

        // Tolerances apply to the velocity the craft hit the ground with.
        let impact = craft.velocity;
        craft.position.y = ground + self.half_height;
        craft.velocity = Vec2::ZERO;

        let on_pad = terrain.is_on_pad(tx);
        if !self.is_good_touchdown(on_pad, craft.angle, impact) {
            craft.alive = false;
            craft.landed = false;
            craft.liftoff_armed = false;
            log::debug!(
                "Crash at sample {} (on pad: {}, angle {:.1}, impact {:?})",
                tx,
                on_pad,
                craft.angle,
                impact
            );
            return Some(LandingEvent::Crashed {
                impact,
                angle: craft.angle,
                on_pad,
            });
        }

        if craft.landed {
            craft.liftoff_armed = craft.throttle > self.rules.liftoff_throttle;
            return None;
        }

        // Settle: upright, engine cut, goals cleared.
        craft.landed = true;
        craft.liftoff_armed = false;
        craft.angle = 0.0;
        craft.goal_velocity = Vec2::ZERO;
        craft.throttle = 0.0;
        log::debug!("Touchdown at sample {} with impact {:?}", tx, impact);
        Some(LandingEvent::Touchdown { impact })
    }
}
