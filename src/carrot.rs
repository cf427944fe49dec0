use hashbrown::HashSet;
use log::{debug, info};
use pepse_geom::Vec2;
use pepse_runtime::{EntityId, GameObject, Layer, Tag};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Engine;
use crate::config::CarrotConfig;
use crate::event::Event;
use crate::terrain::Terrain;

pub const CARROT_TAG: Tag = Tag("carrot");
pub const CARROT_LAYER: Layer = Layer::DEFAULT.offset(1);

const TURN_DEGREES: f32 = 90.0;

/// Flying carrots scattered around the avatar, plus the timed scoring round.
pub struct Carrots {
    cfg: CarrotConfig,
    rng: ChaCha8Rng,
    live: HashSet<EntityId>,
    destroyed: u32,
    high_score: u32,
    rounds: u32,
}

impl Carrots {
    pub fn new(stream: u64, cfg: &CarrotConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            rng: ChaCha8Rng::seed_from_u64(stream),
            live: HashSet::new(),
            destroyed: 0,
            high_score: 0,
            rounds: 0,
        }
    }

    /// Schedules the first round end.
    pub fn start_round(&mut self, engine: &mut Engine) {
        engine.schedule(self.cfg.round_length, None, Event::CarrotRoundEnded);
    }

    /// Spawns a carrot near `around` (the avatar's top-left corner).
    pub fn spawn(&mut self, engine: &mut Engine, around: Vec2) -> EntityId {
        let c = &self.cfg;
        let dx = self.rng.gen_range(-c.scatter_x..c.scatter_x) as f32;
        let dy = self.rng.gen_range(0..c.scatter_y) as f32;
        let mut obj = GameObject::new(around + Vec2::new(dx, -dy), Vec2::splat(c.size)).with_tag(CARROT_TAG);
        obj.velocity = Vec2::RIGHT * c.speed;
        let id = engine.add(obj, CARROT_LAYER);
        engine.schedule(c.lifespan, Some(id), Event::CarrotExpired);
        self.live.insert(id);
        id
    }

    /// Random turns and terrain avoidance, once per frame before physics.
    pub fn steer(&mut self, engine: &mut Engine, terrain: &Terrain) {
        let mut ids: Vec<EntityId> = self.live.iter().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let Some(obj) = engine.objects.get_mut(id) else {
                self.live.remove(&id);
                continue;
            };
            if self.rng.gen_bool(self.cfg.turn_chance) {
                obj.velocity = obj.velocity.rotated(TURN_DEGREES);
                obj.angle += TURN_DEGREES;
            }
            let ground = terrain.ground_height_at(obj.position.x);
            if obj.position.y + obj.dimensions.y > ground {
                obj.velocity = Vec2::UP * self.cfg.speed;
                obj.angle = TURN_DEGREES;
            }
        }
    }

    pub fn expire(&mut self, engine: &mut Engine, id: EntityId) -> bool {
        self.live.remove(&id);
        engine.remove(id)
    }

    /// A fireball hit `id`. Returns false if the carrot was already gone.
    pub fn destroy(&mut self, engine: &mut Engine, id: EntityId) -> bool {
        if !self.live.remove(&id) || !engine.remove(id) {
            return false;
        }
        self.destroyed += 1;
        debug!(target: "carrots", "carrot destroyed ({} this round)", self.destroyed);
        true
    }

    /// Closes the round, keeps the best score and schedules the next one.
    pub fn end_round(&mut self, engine: &mut Engine) {
        self.rounds += 1;
        self.high_score = self.high_score.max(self.destroyed);
        info!(
            target: "carrots",
            "round {} over: {} destroyed, high score {}",
            self.rounds, self.destroyed, self.high_score
        );
        self.destroyed = 0;
        self.start_round(engine);
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    pub fn destroyed(&self) -> u32 {
        self.destroyed
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::world::WorldContext;

    fn setup() -> (Engine, Terrain, Carrots) {
        let cfg = GameConfig::default();
        let ctx = WorldContext::from_config(&cfg);
        (Engine::new(), Terrain::new(&ctx), Carrots::new(7, &cfg.carrots))
    }

    #[test]
    fn spawn_scatters_within_bounds() {
        let (mut e, _, mut c) = setup();
        let around = Vec2::new(1000.0, 300.0);
        for _ in 0..200 {
            let id = c.spawn(&mut e, around);
            let p = e.objects.get(id).unwrap().position;
            assert!(p.x >= 500.0 && p.x < 1500.0);
            assert!(p.y <= 300.0 && p.y > 0.0);
        }
        assert_eq!(c.live_len(), 200);
    }

    #[test]
    fn expires_after_lifespan() {
        let (mut e, _, mut c) = setup();
        let id = c.spawn(&mut e, Vec2::ZERO);
        e.update(29.0);
        assert!(e.pop_due().is_none());
        e.update(1.0);
        let due = e.pop_due().unwrap();
        assert_eq!((due.owner, due.task), (Some(id), Event::CarrotExpired));
        assert!(c.expire(&mut e, id));
        assert_eq!(c.live_len(), 0);
    }

    #[test]
    fn carrots_below_ground_climb() {
        let (mut e, t, mut c) = setup();
        let id = c.spawn(&mut e, Vec2::ZERO);
        if let Some(o) = e.objects.get_mut(id) {
            o.position.y = t.ground_height_at(o.position.x) + 10.0;
        }
        c.steer(&mut e, &t);
        let o = e.objects.get(id).unwrap();
        assert_eq!(o.velocity, Vec2::new(0.0, -400.0));
        assert_eq!(o.angle, 90.0);
    }

    #[test]
    fn round_keeps_high_score() {
        let (mut e, _, mut c) = setup();
        let a = c.spawn(&mut e, Vec2::ZERO);
        let b = c.spawn(&mut e, Vec2::ZERO);
        assert!(c.destroy(&mut e, a));
        assert!(!c.destroy(&mut e, a));
        assert!(c.destroy(&mut e, b));
        c.end_round(&mut e);
        assert_eq!((c.destroyed(), c.high_score(), c.rounds()), (0, 2, 1));
        c.end_round(&mut e);
        assert_eq!(c.high_score(), 2);
    }
}
