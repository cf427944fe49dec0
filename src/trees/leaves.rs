use hashbrown::HashMap;
use log::{debug, trace};
use pepse_geom::Vec2;
use pepse_runtime::{EntityId, GameObject};
use pepse_world::WorldSeed;

use super::leaf::{Leaf, LeafState, LeafTiming};
use super::{LEAF_LAYER, LEAF_TAG};
use crate::Engine;
use crate::event::Event;

/// Canopy builder and per-leaf state, keyed by the leaf's entity.
pub struct Leaves {
    seed: WorldSeed,
    block: i32,
    canopy: i32,
    timing: LeafTiming,
    by_id: HashMap<EntityId, Leaf>,
}

impl Leaves {
    pub fn new(seed: WorldSeed, block: i32, canopy: i32, timing: LeafTiming) -> Self {
        Self {
            seed,
            block,
            canopy,
            timing,
            by_id: HashMap::new(),
        }
    }

    /// Rest slots of a canopy above a trunk of `trunk_height` blocks at `x`.
    pub fn slots(&self, x: i32, ground: f32, trunk_height: i32) -> Vec<Vec2> {
        let b = self.block;
        let left = x as i64 - (b * (self.canopy / 2)) as i64;
        let mut out = Vec::with_capacity((self.canopy * self.canopy) as usize);
        for j in 0..self.canopy {
            for k in 1..=self.canopy {
                out.push(Vec2::new(
                    (left + (b * j) as i64) as f32,
                    ground - (b * (trunk_height + k - 1)) as f32,
                ));
            }
        }
        out
    }

    /// Registers a canopy and schedules each leaf's sway and first fall.
    pub fn spawn_canopy(&mut self, engine: &mut Engine, x: i32, ground: f32, trunk_height: i32) -> Vec<EntityId> {
        let size = self.block as f32;
        let mut ids = Vec::new();
        for rest in self.slots(x, ground, trunk_height) {
            let id = engine.add(
                GameObject::new(rest, Vec2::splat(size)).with_tag(LEAF_TAG),
                LEAF_LAYER,
            );
            let mut leaf = Leaf::new(rest, size, self.seed);
            let (animate, fall) = leaf.initial_delays(&self.timing);
            engine.schedule(animate, Some(id), Event::LeafAnimate);
            engine.schedule(fall, Some(id), Event::LeafFall);
            self.by_id.insert(id, leaf);
            ids.push(id);
        }
        ids
    }

    /// Drops leaves from the engine and from the cycle table. Their pending
    /// tasks are discarded by the engine once they come due.
    pub fn despawn(&mut self, engine: &mut Engine, ids: &[EntityId]) {
        for &id in ids {
            self.by_id.remove(&id);
            engine.remove(id);
        }
    }

    pub fn handle(&mut self, engine: &mut Engine, id: EntityId, ev: Event) {
        let Some(leaf) = self.by_id.get_mut(&id) else {
            trace!(target: "leaves", "{:?} for unknown leaf {:?}", ev, id);
            return;
        };
        let Some(obj) = engine.objects.get_mut(id) else {
            return;
        };
        let t = &self.timing;
        match ev {
            Event::LeafAnimate => leaf.animate(obj, t),
            Event::LeafFall => {
                if !leaf.fall(obj, t) {
                    debug!(target: "leaves", "fall ignored in state {:?}", leaf.state());
                }
            }
            Event::LeafFaded => {
                let wait = leaf.faded(obj, t);
                engine.schedule(wait, Some(id), Event::LeafRespawn);
            }
            Event::LeafRespawn => {
                let wait = leaf.respawn(obj, t);
                engine.schedule(wait, Some(id), Event::LeafFall);
            }
            _ => {}
        }
    }

    /// First contact between a leaf and a ground-tagged object.
    pub fn on_ground_contact(&mut self, engine: &mut Engine, id: EntityId) -> bool {
        let (Some(leaf), Some(obj)) = (self.by_id.get_mut(&id), engine.objects.get_mut(id)) else {
            return false;
        };
        let landed = leaf.land(obj);
        if landed {
            trace!(target: "leaves", "leaf from {:?} landed at {:?}", leaf.rest(), obj.position);
        }
        landed
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Leaf> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn count_in_state(&self, state: LeafState) -> usize {
        self.by_id.values().filter(|l| l.state() == state).count()
    }
}
