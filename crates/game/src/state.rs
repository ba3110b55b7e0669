//! Windowed flight state: the session, keyboard state and frame pacing.

use std::time::{Duration, Instant};

use engine_core::ControlIntent;
use input::InputState;
use physics::{FlightSession, LandingEvent};
use winit::window::Window;

/// Interval between telemetry log lines.
const TELEMETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Longest wall-clock frame fed to the session. Longer gaps (window drags,
/// debugger pauses) are treated as this long and the catch-up cap does the rest.
const MAX_FRAME: Duration = Duration::from_millis(250);

pub(crate) struct LanderState {
    pub window: Window,
    pub input: InputState,
    pub session: FlightSession,
    pub running: bool,
    last_frame: Instant,
    next_telemetry: Duration,
}

impl LanderState {
    pub fn new(window: Window, session: FlightSession) -> Self {
        Self {
            window,
            input: InputState::new(),
            session,
            running: true,
            last_frame: Instant::now(),
            next_telemetry: Duration::ZERO,
        }
    }

    /// Run one frame: sample input, step physics, report.
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = (now - self.last_frame).min(MAX_FRAME);
        self.last_frame = now;

        let intent: ControlIntent = self.input.control_intent();
        let report = self.session.frame(&intent, elapsed);
        self.input.begin_frame();

        for event in &report.events {
            self.announce(event);
        }

        let telemetry = self.session.telemetry();
        if telemetry.elapsed >= self.next_telemetry {
            log::info!("{}", telemetry);
            self.next_telemetry = telemetry.elapsed + TELEMETRY_INTERVAL;
        }
    }

    fn announce(&self, event: &LandingEvent) {
        self.window
            .set_title(&format!("Lander - {}", self.session.status()));
        match event {
            LandingEvent::Touchdown { .. } => {
                log::info!("The Eagle has landed. Hold Up to lift off again, Escape to quit.")
            }
            LandingEvent::Liftoff => log::info!("Airborne again"),
            LandingEvent::Crashed { .. } => log::info!("Craft lost. Press Escape to quit."),
        }
    }
}
