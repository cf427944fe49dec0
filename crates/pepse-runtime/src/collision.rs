use hashbrown::HashSet;

use crate::layer::{Layer, Tag};
use crate::objects::{EntityId, GameObjects};

/// First contact between two objects. `a` comes from the lower of the two layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collision {
    pub a: EntityId,
    pub a_tag: Tag,
    pub b: EntityId,
    pub b_tag: Tag,
}

impl Collision {
    /// The participant tagged `tag`, with the other one, if either side carries it.
    pub fn side(&self, tag: Tag) -> Option<(EntityId, EntityId, Tag)> {
        if self.a_tag == tag {
            Some((self.a, self.b, self.b_tag))
        } else if self.b_tag == tag {
            Some((self.b, self.a, self.a_tag))
        } else {
            None
        }
    }
}

/// Tracks which layer pairs interact and which object pairs are currently touching.
#[derive(Default)]
pub struct CollisionTracker {
    rules: Vec<(Layer, Layer)>,
    touching: HashSet<(EntityId, EntityId)>,
}

#[inline]
fn ordered(a: Layer, b: Layer) -> (Layer, Layer) {
    if a <= b { (a, b) } else { (b, a) }
}

impl CollisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_layers_collide(&mut self, a: Layer, b: Layer, enabled: bool) {
        let key = ordered(a, b);
        let pos = self.rules.iter().position(|&r| r == key);
        match (pos, enabled) {
            (None, true) => {
                self.rules.push(key);
                self.rules.sort();
            }
            (Some(i), false) => {
                self.rules.remove(i);
            }
            _ => {}
        }
    }

    pub fn layers_collide(&self, a: Layer, b: Layer) -> bool {
        self.rules.contains(&ordered(a, b))
    }

    /// Pairs that overlap now but did not on the previous call.
    pub fn detect<T>(&mut self, objects: &GameObjects<T>) -> Vec<Collision> {
        let mut now = HashSet::with_capacity(self.touching.len());
        let mut fresh = Vec::new();
        for &(la, lb) in &self.rules {
            for a in objects.objects_in_layer(la) {
                let Some(oa) = objects.get(a) else { continue };
                for b in objects.objects_in_layer(lb) {
                    if la == lb && b <= a {
                        continue;
                    }
                    let Some(ob) = objects.get(b) else { continue };
                    if oa.is_immovable() && ob.is_immovable() {
                        continue;
                    }
                    if !oa.bounds().overlaps(&ob.bounds()) {
                        continue;
                    }
                    let key = (a, b);
                    if !self.touching.contains(&key) {
                        fresh.push(Collision { a, a_tag: oa.tag, b, b_tag: ob.tag });
                    }
                    now.insert(key);
                }
            }
        }
        self.touching = now;
        fresh
    }

    pub fn touching_len(&self) -> usize {
        self.touching.len()
    }
}
