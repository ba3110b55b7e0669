//! Procedural generation for the landing terrain.

pub mod terrain;

pub use terrain::*;
