//! Core engine types and utilities for the lander.
//!
//! This crate provides the foundational types used across all crates:
//! - Fixed-step time management
//! - The per-frame operator intent record
//! - World and craft dimensions

pub mod angle;
pub mod intent;
pub mod time;
pub mod world;

pub use angle::*;
pub use intent::*;
pub use time::*;
pub use world::*;

// Re-export commonly used types
pub use glam::Vec2;
