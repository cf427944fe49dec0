//! Single-threaded game-object runtime: layered registry, timed tasks, tweens and contacts.
#![forbid(unsafe_code)]

mod collision;
mod engine;
mod layer;
mod objects;
mod scheduler;
mod transition;

pub use collision::{Collision, CollisionTracker};
pub use engine::Engine;
pub use layer::{Layer, Tag};
pub use objects::{EntityId, GameObject, GameObjects};
pub use scheduler::{Scheduled, Scheduler, secs_to_us};
pub use transition::{Channel, Transition, TransitionId, TransitionMode, TweenValue};
