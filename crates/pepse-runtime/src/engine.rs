use log::trace;

use crate::collision::{Collision, CollisionTracker};
use crate::layer::Layer;
use crate::objects::{EntityId, GameObject, GameObjects};
use crate::scheduler::{Scheduled, Scheduler};
use crate::transition::{Transition, TransitionId};

/// Objects, timed tasks and contacts advanced together one frame at a time.
pub struct Engine<T> {
    pub objects: GameObjects<T>,
    pub scheduler: Scheduler<T>,
    pub collisions: CollisionTracker,
    completed: Vec<(EntityId, T)>,
    scratch: Vec<T>,
}

impl<T> Default for Engine<T> {
    fn default() -> Self {
        Self {
            objects: GameObjects::new(),
            scheduler: Scheduler::new(),
            collisions: CollisionTracker::new(),
            completed: Vec::new(),
            scratch: Vec::new(),
        }
    }
}

impl<T> Engine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, obj: GameObject<T>, layer: Layer) -> EntityId {
        self.objects.add(obj, layer)
    }

    #[inline]
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.objects.remove(id).is_some()
    }

    pub fn add_transition(&mut self, id: EntityId, transition: Transition<T>) -> Option<TransitionId> {
        self.objects.get_mut(id).map(|o| o.add_transition(transition))
    }

    pub fn remove_transition(&mut self, id: EntityId, transition: TransitionId) -> bool {
        self.objects.get_mut(id).is_some_and(|o| o.remove_transition(transition))
    }

    /// Schedules `task` for `owner` after `delay` seconds.
    #[inline]
    pub fn schedule(&mut self, delay: f32, owner: Option<EntityId>, task: T) -> u64 {
        self.scheduler.emit_after(delay, owner, task)
    }

    /// One frame: clock, transitions, motion, then first contacts.
    pub fn update(&mut self, dt: f32) -> Vec<Collision> {
        self.scheduler.advance(dt);
        for (id, obj) in self.objects.iter_mut() {
            obj.tick_transitions(dt, &mut self.scratch);
            self.completed.extend(self.scratch.drain(..).map(|t| (id, t)));
            obj.integrate(dt);
        }
        for (id, task) in self.completed.drain(..) {
            self.scheduler.emit_now(Some(id), task);
        }
        self.collisions.detect(&self.objects)
    }

    /// Next due task whose owner (if any) is still registered.
    pub fn pop_due(&mut self) -> Option<Scheduled<T>> {
        while let Some(s) = self.scheduler.pop_due() {
            match s.owner {
                Some(owner) if !self.objects.contains(owner) => {
                    trace!(target: "events", "dropping task {} of removed {:?}", s.id, owner);
                }
                _ => return Some(s),
            }
        }
        None
    }

    #[inline]
    pub fn now_secs(&self) -> f32 {
        self.scheduler.now_secs()
    }
}
