use std::collections::{BTreeMap, BTreeSet};

use pepse_geom::{Rect, Vec2};

use crate::layer::{Layer, Tag};
use crate::transition::{Channel, Transition, TransitionId};

/// Generational handle into [`GameObjects`]. A handle whose object was removed
/// never resolves again, even after its slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
pub struct GameObject<T> {
    /// Top-left corner.
    pub position: Vec2,
    pub dimensions: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// 0 marks the object immovable.
    pub mass: f32,
    pub opacity: f32,
    /// Render rotation in degrees.
    pub angle: f32,
    pub flipped: bool,
    pub tag: Tag,
    transitions: Vec<Transition<T>>,
    next_transition: u32,
}

impl<T> GameObject<T> {
    pub fn new(position: Vec2, dimensions: Vec2) -> Self {
        Self {
            position,
            dimensions,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            opacity: 1.0,
            angle: 0.0,
            flipped: false,
            tag: Tag::NONE,
            transitions: Vec::new(),
            next_transition: 1,
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn immovable(mut self) -> Self {
        self.mass = 0.0;
        self
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.dimensions)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.dimensions * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.position = center - self.dimensions * 0.5;
    }

    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.mass == 0.0
    }

    pub fn add_transition(&mut self, mut transition: Transition<T>) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition = self.next_transition.wrapping_add(1).max(1);
        transition.id = id;
        self.transitions.push(transition);
        id
    }

    /// Returns false when the transition was already gone.
    pub fn remove_transition(&mut self, id: TransitionId) -> bool {
        let before = self.transitions.len();
        self.transitions.retain(|t| t.id != id);
        self.transitions.len() != before
    }

    pub fn has_transition(&self, id: TransitionId) -> bool {
        self.transitions.iter().any(|t| t.id == id)
    }

    pub fn transitions(&self) -> &[Transition<T>] {
        &self.transitions
    }

    /// Advances every transition and writes its value into the driven channel.
    /// Completion tasks of finished transitions are appended to `completed`.
    pub(crate) fn tick_transitions(&mut self, dt: f32, completed: &mut Vec<T>) {
        for tr in self.transitions.iter_mut() {
            if let Some(task) = tr.advance(dt) {
                completed.push(task);
            }
            let v = tr.value();
            match tr.channel() {
                Channel::Angle => self.angle = v.as_scalar(),
                Channel::Opacity => self.opacity = v.as_scalar().clamp(0.0, 1.0),
                Channel::Dimensions => self.dimensions = v.as_vector(),
                Channel::Velocity => self.velocity = v.as_vector(),
            }
        }
        self.transitions.retain(|t| !t.is_finished());
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }
}

struct Slot<T> {
    generation: u32,
    entry: Option<(GameObject<T>, Layer)>,
}

/// Layered object registry.
pub struct GameObjects<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    layers: BTreeMap<Layer, BTreeSet<EntityId>>,
    len: usize,
}

impl<T> Default for GameObjects<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            layers: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<T> GameObjects<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obj: GameObject<T>, layer: Layer) -> EntityId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some((obj, layer));
                EntityId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entry: Some((obj, layer)) });
                EntityId { index, generation: 0 }
            }
        };
        self.layers.entry(layer).or_default().insert(id);
        self.len += 1;
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<GameObject<T>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let (obj, layer) = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if let Some(set) = self.layers.get_mut(&layer) {
            set.remove(&id);
            if set.is_empty() {
                self.layers.remove(&layer);
            }
        }
        self.len -= 1;
        Some(obj)
    }

    /// Removes every object in `layer` matching `pred`; returns how many went.
    pub fn remove_where(&mut self, layer: Layer, mut pred: impl FnMut(&GameObject<T>) -> bool) -> usize {
        let doomed: Vec<EntityId> = self
            .objects_in_layer(layer)
            .filter(|&id| self.get(id).is_some_and(&mut pred))
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&GameObject<T>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref().map(|(o, _)| o)
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut GameObject<T>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut().map(|(o, _)| o)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn layer_of(&self, id: EntityId) -> Option<Layer> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref().map(|(_, l)| *l)
    }

    /// Ids in `layer`, in a stable order.
    pub fn objects_in_layer(&self, layer: Layer) -> impl Iterator<Item = EntityId> + '_ {
        self.layers.get(&layer).into_iter().flat_map(|set| set.iter().copied())
    }

    pub fn count_in_layer(&self, layer: Layer) -> usize {
        self.layers.get(&layer).map_or(0, BTreeSet::len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut GameObject<T>)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.entry
                .as_mut()
                .map(|(o, _)| (EntityId { index: i as u32, generation }, o))
        })
    }
}
