use log::trace;
use pepse_geom::{Rect, Vec2};
use pepse_runtime::{EntityId, GameObject, Layer, Tag};
use pepse_world::hash::stream_seed;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Engine;
use crate::config::AvatarConfig;
use crate::terrain::Terrain;
use crate::trees::TRUNK_LAYER;
use crate::world::WorldContext;

pub const AVATAR_TAG: Tag = Tag("avatar");
pub const AVATAR_LAYER: Layer = Layer::DEFAULT;

/// Vertical speed above which the avatar counts as airborne.
const MID_AIR_SPEED: f32 = 200.0;

/// Held inputs for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Held with `jump` to fly.
    pub fly: bool,
    pub fire: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Still,
    Running,
    Airborne,
    Flying,
    Firing,
}

/// Side effects the avatar requests from the rest of the world this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Fire from this top-left corner.
    pub fire_from: Option<(Vec2, Facing)>,
    pub spawn_carrot: bool,
}

pub struct Avatar {
    id: EntityId,
    cfg: AvatarConfig,
    energy: f32,
    facing: Facing,
    pose: Pose,
    grounded: bool,
    rng: ChaCha8Rng,
}

impl Avatar {
    /// Registers the avatar standing on the ground at `x`.
    pub fn spawn(engine: &mut Engine, ctx: &WorldContext, terrain: &Terrain, cfg: &AvatarConfig, x: f32) -> Self {
        let size = Vec2::new(cfg.width, cfg.height);
        let pos = Vec2::new(x, terrain.ground_height_at(x + size.x * 0.5) - size.y);
        let mut obj = GameObject::new(pos, size).with_tag(AVATAR_TAG);
        obj.acceleration = Vec2::new(0.0, cfg.gravity);
        let id = engine.add(obj, AVATAR_LAYER);
        Self {
            id,
            cfg: cfg.clone(),
            energy: cfg.max_energy,
            facing: Facing::Right,
            pose: Pose::Still,
            grounded: true,
            rng: ChaCha8Rng::seed_from_u64(stream_seed(pos, ctx.seed)),
        }
    }

    /// Applies input before physics runs. Returns what the world should spawn.
    pub fn control(&mut self, engine: &mut Engine, input: Controls) -> Intent {
        let mut intent = Intent::default();
        let Some(obj) = engine.objects.get_mut(self.id) else {
            return intent;
        };
        let c = &self.cfg;

        if obj.velocity.y > c.max_fall_speed {
            obj.velocity.y = c.max_fall_speed;
        }

        let mut vx = 0.0;
        if input.left {
            vx -= c.walk_speed;
            self.facing = Facing::Left;
            obj.flipped = true;
        }
        if input.right {
            vx += c.walk_speed;
            self.facing = Facing::Right;
            obj.flipped = false;
        }
        obj.velocity.x = vx;

        self.pose = if obj.velocity.y.abs() > MID_AIR_SPEED {
            Pose::Airborne
        } else if (input.left || input.right) && self.grounded {
            Pose::Running
        } else {
            Pose::Still
        };

        if self.grounded {
            self.energy = (self.energy + c.energy_step).min(c.max_energy);
            if input.jump {
                obj.velocity.y = -c.jump_speed;
                self.grounded = false;
            }
        }

        if self.energy > 0.0 && input.jump && input.fly {
            obj.velocity.y = -c.jump_speed;
            self.energy = (self.energy - c.energy_step).max(0.0);
            self.grounded = false;
            self.pose = Pose::Flying;
        }

        intent.spawn_carrot = self.rng.gen_bool(c.carrot_spawn_chance);

        if self.energy > c.fire_cost && input.fire {
            self.energy -= c.fire_cost;
            self.pose = Pose::Firing;
            intent.fire_from = Some((obj.position, self.facing));
        }
        intent
    }

    /// Resolves contact with the ground and with trunks after physics moved the avatar.
    pub fn settle(&mut self, engine: &mut Engine, terrain: &Terrain) {
        let trunks: Vec<Rect> = engine
            .objects
            .objects_in_layer(TRUNK_LAYER)
            .filter_map(|id| engine.objects.get(id).map(GameObject::bounds))
            .collect();
        let Some(obj) = engine.objects.get_mut(self.id) else {
            return;
        };
        let mut grounded = false;

        for trunk in &trunks {
            let Some(push) = obj.bounds().penetration(trunk) else {
                continue;
            };
            obj.position += push;
            if push.x != 0.0 {
                obj.velocity.x = 0.0;
            } else if push.y < 0.0 && obj.velocity.y >= 0.0 {
                obj.velocity.y = 0.0;
                grounded = true;
            } else if push.y > 0.0 && obj.velocity.y < 0.0 {
                obj.velocity.y = 0.0;
            }
        }

        let ground = terrain.ground_height_at(obj.center().x);
        if obj.position.y + obj.dimensions.y >= ground && obj.velocity.y >= 0.0 {
            obj.position.y = ground - obj.dimensions.y;
            obj.velocity.y = 0.0;
            grounded = true;
        }
        if grounded != self.grounded {
            trace!(target: "avatar", "grounded={} at {:?}", grounded, obj.position);
        }
        self.grounded = grounded;
    }

    /// Moves the avatar to `x`, standing on the ground there.
    pub fn warp(&mut self, engine: &mut Engine, terrain: &Terrain, x: f32) {
        if let Some(obj) = engine.objects.get_mut(self.id) {
            let ground = terrain.ground_height_at(x + obj.dimensions.x * 0.5);
            obj.position = Vec2::new(x, ground - obj.dimensions.y);
            obj.velocity = Vec2::ZERO;
            self.grounded = true;
        }
    }

    /// Top-left corner.
    pub fn position(&self, engine: &Engine) -> Vec2 {
        engine.objects.get(self.id).map_or(Vec2::ZERO, |o| o.position)
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn setup() -> (Engine, Terrain, Avatar) {
        let mut cfg = GameConfig::default();
        cfg.avatar.carrot_spawn_chance = 0.0;
        let ctx = WorldContext::from_config(&cfg);
        let terrain = Terrain::new(&ctx);
        let mut engine = Engine::new();
        let avatar = Avatar::spawn(&mut engine, &ctx, &terrain, &cfg.avatar, 400.0);
        (engine, terrain, avatar)
    }

    fn frame(engine: &mut Engine, terrain: &Terrain, avatar: &mut Avatar, input: Controls) -> Intent {
        let intent = avatar.control(engine, input);
        engine.update(1.0 / 60.0);
        avatar.settle(engine, terrain);
        intent
    }

    #[test]
    fn stays_on_ground_when_idle() {
        let (mut e, t, mut a) = setup();
        for _ in 0..120 {
            frame(&mut e, &t, &mut a, Controls::default());
        }
        assert!(a.is_grounded());
        let p = a.position(&e);
        let ground = t.ground_height_at(p.x + 35.0);
        assert!((p.y + 84.0 - ground).abs() < 1e-3);
    }

    #[test]
    fn walking_right_moves_and_faces_right() {
        let (mut e, t, mut a) = setup();
        let x0 = a.position(&e).x;
        for _ in 0..60 {
            frame(&mut e, &t, &mut a, Controls { right: true, ..Controls::default() });
        }
        let dx = a.position(&e).x - x0;
        assert!((dx - 300.0).abs() < 1.0, "dx={dx}");
        assert_eq!(a.facing(), Facing::Right);
    }

    #[test]
    fn flying_drains_and_ground_restores_energy() {
        let (mut e, t, mut a) = setup();
        for _ in 0..20 {
            frame(&mut e, &t, &mut a, Controls { jump: true, fly: true, ..Controls::default() });
        }
        assert!(!a.is_grounded());
        assert!(a.energy() < 100.0);
        assert_eq!(a.pose(), Pose::Flying);
        for _ in 0..600 {
            frame(&mut e, &t, &mut a, Controls::default());
        }
        assert!(a.is_grounded());
        assert_eq!(a.energy(), 100.0);
    }

    #[test]
    fn firing_costs_energy_and_needs_enough() {
        let (mut e, t, mut a) = setup();
        let i = frame(&mut e, &t, &mut a, Controls { fire: true, ..Controls::default() });
        assert!(i.fire_from.is_some());
        assert_eq!(a.energy(), 98.0);
        let mut shots = 1;
        for _ in 0..200 {
            if frame(&mut e, &t, &mut a, Controls { fire: true, ..Controls::default() }).fire_from.is_some() {
                shots += 1;
            }
        }
        assert!(a.energy() <= 2.5);
        assert!(shots > 50);
    }

    #[test]
    fn fall_speed_is_clamped() {
        let (mut e, t, mut a) = setup();
        a.warp(&mut e, &t, 400.0);
        if let Some(o) = e.objects.get_mut(a.id()) {
            o.position.y -= 5000.0;
            o.velocity.y = 900.0;
        }
        a.grounded = false;
        a.control(&mut e, Controls::default());
        assert_eq!(e.objects.get(a.id()).unwrap().velocity.y, 500.0);
    }
}
