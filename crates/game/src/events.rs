//! Window event handling for LanderState.

use winit::event::WindowEvent;
use winit::keyboard::PhysicalKey;

impl crate::state::LanderState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Focused(false) => {
                // Key releases are not delivered to an unfocused window.
                self.input.release_all();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                    if self.input.is_quit_pressed() {
                        log::info!("Quit requested");
                        self.running = false;
                        return true;
                    }
                }
                false
            }
            _ => false,
        }
    }
}
