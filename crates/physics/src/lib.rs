//! Flight core for the lander: craft state, control laws, landing
//! evaluation and the fixed-step session that ties them together.

pub mod control;
pub mod craft;
pub mod landing;
pub mod session;

pub use control::*;
pub use craft::*;
pub use landing::*;
pub use session::*;
