//! Keyboard input handling for the lander.
//!
//! Tracks key state between window events and turns it into the
//! device-independent [`ControlIntent`] the flight core consumes.

use engine_core::ControlIntent;
use std::collections::HashSet;

/// Key bindings for the flight controls.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub thrust_up: KeyCode,
    pub thrust_down: KeyCode,
    pub rotate_left: KeyCode,
    pub rotate_right: KeyCode,
    pub side_thrust: KeyCode,
    pub toggle_fly_by_wire: KeyCode,
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            thrust_up: KeyCode::ArrowUp,
            thrust_down: KeyCode::ArrowDown,
            rotate_left: KeyCode::ArrowLeft,
            rotate_right: KeyCode::ArrowRight,
            side_thrust: KeyCode::Space,
            toggle_fly_by_wire: KeyCode::KeyA,
            quit: KeyCode::Escape,
        }
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Clear per-frame state. Call once the frame's intent has been consumed.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        if !self.keys_held.is_empty() {
            log::debug!("Releasing {} held keys", self.keys_held.len());
        }
        self.keys_released.extend(self.keys_held.drain());
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(self.bindings.quit)
    }

    /// Build this frame's intent record.
    ///
    /// The fly-by-wire toggle is edge-triggered: holding the key only toggles once.
    pub fn control_intent(&self) -> ControlIntent {
        let b = &self.bindings;
        ControlIntent {
            thrust_up: self.is_key_held(b.thrust_up),
            thrust_down: self.is_key_held(b.thrust_down),
            rotate_left: self.is_key_held(b.rotate_left),
            rotate_right: self.is_key_held(b.rotate_right),
            side_thrust: self.is_key_held(b.side_thrust),
            toggle_fly_by_wire: self.is_key_pressed(b.toggle_fly_by_wire),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
