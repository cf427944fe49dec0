//! Height field, deterministic hashing, tree placement, and worldgen parameters.
#![forbid(unsafe_code)]

pub mod grid;
pub mod hash;
pub mod noise;
pub mod terrain;
pub mod trees;
pub mod worldgen;

pub use grid::{GridRange, snap_down, snap_up};
pub use noise::NoiseGenerator;
pub use terrain::HeightField;
pub use trees::TreeSampler;
pub use worldgen::{WorldGenConfig, WorldGenParams};

/// Process-wide world seed. Set once at startup and never mutated.
pub type WorldSeed = i32;
