//! Lander - 2D lunar descent with manual and fly-by-wire control

mod autopilot;
mod config;
mod events;
mod state;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use config::LanderConfig;
use physics::FlightSession;
use procgen::TerrainModel;
use state::LanderState;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Target frame interval for the windowed loop.
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Command-line switches.
#[derive(Debug, Parser, PartialEq)]
#[clap(author, version, about = "2D lunar lander with manual and fly-by-wire control", long_about = None)]
struct Options {
    /// Fly headless under the scripted pilot
    #[clap(long)]
    autopilot: bool,
    /// Terrain seed, overriding lander.ron
    #[clap(long)]
    seed: Option<u64>,
    /// Write the effective config to lander.ron
    #[clap(long)]
    write_config: bool,
}

fn build_session(config: &LanderConfig) -> Result<FlightSession> {
    let terrain = TerrainModel::generate(&config.terrain, config.world.width_m)
        .context("generating terrain")?;
    log::info!("Terrain seed {}", terrain.seed());
    FlightSession::new(&config.session_config(), terrain).context("starting flight session")
}

/// Application handler for winit.
struct App {
    config: LanderConfig,
    state: Option<LanderState>,
}

impl App {
    fn new(config: LanderConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Lander")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => w,
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match build_session(&self.config) {
                Ok(session) => self.state = Some(LanderState::new(window, session)),
                Err(e) => {
                    log::error!("Failed to initialize flight: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.update();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();
    let mut config = LanderConfig::load();
    if options.seed.is_some() {
        config.terrain.seed = options.seed;
    }
    if options.write_config {
        config.save();
        log::info!("Wrote lander.ron");
    }

    if options.autopilot {
        log::info!("Starting Lander (autopilot, headless)");
        let mut session = build_session(&config)?;
        let status = autopilot::run_headless(&mut session, config.goal_increment);
        log::info!("Flight ended: {}", status);
        return Ok(());
    }

    println!("Lander controls:");
    println!("  Up / Down     - throttle (fly-by-wire: goal vertical speed)");
    println!("  Left / Right  - rotate (fly-by-wire: goal horizontal speed)");
    println!("  Space + L/R   - side jets");
    println!("  A             - toggle fly-by-wire");
    println!("  Escape        - quit");

    log::info!("Starting Lander");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
