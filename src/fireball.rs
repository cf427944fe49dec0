use hashbrown::HashSet;
use pepse_geom::Vec2;
use pepse_runtime::{Channel, EntityId, GameObject, Layer, Tag, Transition, TransitionMode, TweenValue};

use crate::Engine;
use crate::avatar::Facing;
use crate::config::FireballConfig;
use crate::event::Event;

pub const FIREBALL_TAG: Tag = Tag("fireball");
pub const FIREBALL_LAYER: Layer = Layer::DEFAULT.offset(2);

// Muzzle offsets from the avatar's top-left corner.
const RIGHT_OFFSET: Vec2 = Vec2::new(50.0, 25.0);
const LEFT_OFFSET: Vec2 = Vec2::new(-130.0, 25.0);

pub struct Fireballs {
    cfg: FireballConfig,
    live: HashSet<EntityId>,
}

impl Fireballs {
    pub fn new(cfg: &FireballConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            live: HashSet::new(),
        }
    }

    /// Launches a fireball that fades out over its lifespan and expires with it.
    pub fn fire(&mut self, engine: &mut Engine, from: Vec2, facing: Facing) -> EntityId {
        let c = &self.cfg;
        let (offset, dir) = match facing {
            Facing::Right => (RIGHT_OFFSET, Vec2::RIGHT),
            Facing::Left => (LEFT_OFFSET, Vec2::LEFT),
        };
        let mut obj = GameObject::new(from + offset, Vec2::new(c.width, c.height)).with_tag(FIREBALL_TAG);
        obj.velocity = dir * c.speed;
        obj.flipped = facing == Facing::Right;
        obj.add_transition(Transition::new(
            Channel::Opacity,
            TweenValue::Scalar(1.0),
            TweenValue::Scalar(0.0),
            c.lifespan,
            TransitionMode::Once,
        ));
        let id = engine.add(obj, FIREBALL_LAYER);
        engine.schedule(c.lifespan, Some(id), Event::FireballExpired);
        self.live.insert(id);
        id
    }

    pub fn expire(&mut self, engine: &mut Engine, id: EntityId) -> bool {
        self.live.remove(&id);
        engine.remove(id)
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrot::CARROT_LAYER;

    #[test]
    fn fires_in_facing_direction() {
        let mut e = Engine::new();
        let mut f = Fireballs::new(&FireballConfig::default());
        let r = f.fire(&mut e, Vec2::new(100.0, 100.0), Facing::Right);
        let l = f.fire(&mut e, Vec2::new(100.0, 100.0), Facing::Left);
        let (r, l) = (e.objects.get(r).unwrap(), e.objects.get(l).unwrap());
        assert_eq!(r.position, Vec2::new(150.0, 125.0));
        assert_eq!(r.velocity, Vec2::new(500.0, 0.0));
        assert_eq!(l.position, Vec2::new(-30.0, 125.0));
        assert_eq!(l.velocity, Vec2::new(-500.0, 0.0));
        assert_eq!(r.dimensions, Vec2::new(150.0, 50.0));
    }

    #[test]
    fn fades_then_expires() {
        let mut e = Engine::new();
        let mut f = Fireballs::new(&FireballConfig::default());
        let id = f.fire(&mut e, Vec2::ZERO, Facing::Right);
        e.update(3.5);
        assert!((e.objects.get(id).unwrap().opacity - 0.5).abs() < 1e-4);
        e.update(3.5);
        let due = e.pop_due().unwrap();
        assert_eq!(due.task, Event::FireballExpired);
        assert!(f.expire(&mut e, id));
        assert_eq!(f.live_len(), 0);
        assert_eq!(e.objects.count_in_layer(FIREBALL_LAYER), 0);
        assert_eq!(e.objects.count_in_layer(CARROT_LAYER), 0);
    }
}
