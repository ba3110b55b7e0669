//! Per-frame operator intent, decoupled from any physical input device.

/// What the operator asked for this frame.
///
/// Held keys map to the continuous flags; `toggle_fly_by_wire` is an edge and
/// is only true on the frame the toggle was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlIntent {
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub side_thrust: bool,
    pub toggle_fly_by_wire: bool,
}

impl ControlIntent {
    /// No keys held.
    pub const IDLE: Self = Self {
        thrust_up: false,
        thrust_down: false,
        rotate_left: false,
        rotate_right: false,
        side_thrust: false,
        toggle_fly_by_wire: false,
    };
}
