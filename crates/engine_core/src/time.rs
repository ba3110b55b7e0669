//! Time management for the simulation loop.
//!
//! Wall-clock frame time is accumulated and drained in whole fixed-size
//! ticks, so the physics rate is independent of the display rate.

use std::time::Duration;

use thiserror::Error;

/// Default physics rate.
pub const DEFAULT_FIXED_RATE_HZ: f64 = 60.0;

#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("fixed rate must be a positive finite frequency, got {0} Hz")]
    InvalidRate(f64),
}

/// Manages frame timing and the fixed-step accumulator.
#[derive(Debug)]
pub struct Time {
    /// Total elapsed time fed into the clock.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics.
    fixed_timestep: Duration,
    /// Accumulated time not yet consumed by fixed updates.
    accumulator: Duration,
    /// Fixed ticks consumed since start.
    tick_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock ticking at [`DEFAULT_FIXED_RATE_HZ`].
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / DEFAULT_FIXED_RATE_HZ),
            accumulator: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Create a clock with the given fixed rate.
    pub fn with_fixed_rate(hz: f64) -> Result<Self, TimeError> {
        let mut time = Self::new();
        time.set_fixed_rate(hz)?;
        Ok(time)
    }

    /// Feed an externally measured frame duration into the clock.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
        self.frame_count += 1;
        self.accumulator += delta;
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of fixed ticks consumed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Get the fixed timestep as a Duration.
    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Drop whole pending ticks, keeping only the sub-tick remainder.
    /// Returns how many ticks were discarded.
    pub fn discard_backlog(&mut self) -> u32 {
        let step = self.fixed_timestep.as_nanos();
        let pending = self.accumulator.as_nanos();
        let dropped = u32::try_from(pending / step).unwrap_or(u32::MAX);
        self.accumulator = Duration::from_nanos((pending % step) as u64);
        dropped
    }

    /// Time waiting in the accumulator.
    pub fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) -> Result<(), TimeError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(TimeError::InvalidRate(hz));
        }
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
        log::debug!("Fixed timestep set to {:?} ({} Hz)", self.fixed_timestep, hz);
        Ok(())
    }
}
