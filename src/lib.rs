//! Side-scrolling world simulation: an endless procedural landscape streamed
//! in and out around a walking, flying avatar.
#![forbid(unsafe_code)]

pub mod app;
pub mod avatar;
pub mod carrot;
pub mod config;
pub mod day_cycle;
pub mod event;
pub mod fireball;
pub mod stream;
pub mod terrain;
pub mod trees;
pub mod world;

pub use app::{App, Stats};
pub use avatar::{Controls, Facing, Pose};
pub use config::GameConfig;
pub use stream::{StreamOp, StreamWindow};
pub use terrain::Terrain;
pub use trees::Trees;
pub use world::WorldContext;

/// The object runtime specialised to this game's deferred events.
pub type Engine = pepse_runtime::Engine<event::Event>;
