use log::{debug, trace};
use pepse_runtime::EntityId;

/// Deferred work routed through the scheduler. The owning entity travels with
/// the scheduled task, so variants carry no handles of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    // Leaf cycle
    LeafAnimate,
    LeafFall,
    LeafFaded,
    LeafRespawn,

    // Ephemeral entities
    CarrotExpired,
    FireballExpired,
    CarrotRoundEnded,
}

pub fn log_event(now: f32, owner: Option<EntityId>, ev: &Event) {
    match ev {
        Event::LeafAnimate | Event::LeafFall | Event::LeafFaded | Event::LeafRespawn => {
            trace!(target: "events", "[{:.3}s] {:?} owner={:?}", now, ev, owner);
        }
        Event::CarrotExpired | Event::FireballExpired => {
            trace!(target: "events", "[{:.3}s] {:?} owner={:?}", now, ev, owner);
        }
        Event::CarrotRoundEnded => {
            debug!(target: "events", "[{:.3}s] CarrotRoundEnded", now);
        }
    }
}
