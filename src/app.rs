use std::error::Error;

use log::{debug, info};
use pepse_geom::Vec2;
use pepse_runtime::{Collision, EntityId, GameObject, Layer, Tag};
use pepse_world::hash::stream_seed;

use crate::Engine;
use crate::avatar::{Avatar, Controls};
use crate::carrot::{CARROT_LAYER, CARROT_TAG, Carrots};
use crate::config::GameConfig;
use crate::day_cycle::DayCycle;
use crate::event::{Event, log_event};
use crate::fireball::{FIREBALL_LAYER, FIREBALL_TAG, Fireballs};
use crate::stream::{StreamOp, StreamWindow};
use crate::terrain::{GROUND_TAG, SURFACE_LAYER, Terrain};
use crate::trees::{LEAF_LAYER, LEAF_TAG, Trees};
use crate::world::WorldContext;

const SUN_TAG: Tag = Tag("sun");
const NIGHT_TAG: Tag = Tag("night");
const SUN_LAYER: Layer = Layer::BACKGROUND.offset(1);
const NIGHT_LAYER: Layer = Layer::FOREGROUND;

/// Snapshot of world bookkeeping, for logs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub frame: u64,
    pub time: f32,
    pub avatar_x: f32,
    pub energy: f32,
    pub objects: usize,
    pub columns: usize,
    pub trees: usize,
    pub leaves: usize,
    pub cached_tree_columns: usize,
    pub pending_tasks: usize,
    pub carrots: usize,
    pub fireballs: usize,
    pub destroyed: u32,
    pub high_score: u32,
}

/// Owns the world and advances it one frame at a time.
pub struct App {
    cfg: GameConfig,
    ctx: WorldContext,
    engine: Engine,
    terrain: Terrain,
    trees: Trees,
    window: StreamWindow,
    avatar: Avatar,
    carrots: Carrots,
    fireballs: Fireballs,
    day: DayCycle,
    sun: EntityId,
    night: EntityId,
    frame: u64,
}

impl App {
    pub fn new(cfg: GameConfig) -> Result<Self, Box<dyn Error>> {
        cfg.validate()?;
        let ctx = WorldContext::from_config(&cfg);
        let mut engine = Engine::new();
        engine.collisions.should_layers_collide(LEAF_LAYER, SURFACE_LAYER, true);
        engine.collisions.should_layers_collide(CARROT_LAYER, FIREBALL_LAYER, true);

        let terrain = Terrain::new(&ctx);
        let trees = Trees::new(&ctx);
        let window = StreamWindow::new(ctx.half_width(), cfg.stream.buffer);
        let avatar = Avatar::spawn(&mut engine, &ctx, &terrain, &cfg.avatar, ctx.window.x / 2.0);
        let mut carrots = Carrots::new(stream_seed(Vec2::ZERO, ctx.seed) ^ 0xCA77_0075, &cfg.carrots);
        carrots.start_round(&mut engine);
        let fireballs = Fireballs::new(&cfg.fireball);

        let day = DayCycle::new(cfg.day.cycle_length, ctx.window);
        let sky = day.sample();
        let mut sun = GameObject::new(Vec2::ZERO, Vec2::splat(cfg.day.sun_size)).with_tag(SUN_TAG);
        sun.set_center(sky.sun_center);
        let sun = engine.add(sun.immovable(), SUN_LAYER);
        let mut night = GameObject::new(Vec2::ZERO, ctx.window).with_tag(NIGHT_TAG).immovable();
        night.opacity = sky.night_opacity;
        let night = engine.add(night, NIGHT_LAYER);

        let mut app = Self {
            cfg,
            ctx,
            engine,
            terrain,
            trees,
            window,
            avatar,
            carrots,
            fireballs,
            day,
            sun,
            night,
            frame: 0,
        };
        let x = app.anchor_x();
        let ops = app.window.prime(x);
        app.apply(&ops);
        info!(
            target: "stream",
            "world seed {} primed around x={} ({} columns, {} trees)",
            app.ctx.seed,
            x,
            app.terrain.materialized_len(),
            app.trees.live_len()
        );
        Ok(app)
    }

    /// Streaming anchor: the avatar's left edge, truncated to whole pixels.
    fn anchor_x(&self) -> i32 {
        self.avatar.position(&self.engine).x.floor() as i32
    }

    /// Creates first so a frame never shows a gap, then deletes.
    fn apply(&mut self, ops: &[StreamOp]) {
        for op in ops {
            if let StreamOp::Create { min, max } = *op {
                self.terrain.create_in_range(&mut self.engine, min, max);
                self.trees.create_in_range(&mut self.engine, &self.terrain, min, max);
            }
        }
        for op in ops {
            if let StreamOp::Delete { min, max } = *op {
                self.terrain.delete_in_range(&mut self.engine, min, max);
                self.trees.delete_in_range(&mut self.engine, min, max);
            }
        }
    }

    fn stream(&mut self) {
        let x = self.anchor_x();
        let ops = self.window.advance(x);
        if ops.is_empty() {
            return;
        }
        self.apply(&ops);
        let pruned = self.trees.prune(x, self.cfg.stream.prune_margin);
        if pruned > 0 {
            debug!(target: "trees", "pruned {} cached columns", pruned);
        }
    }

    pub fn step(&mut self, dt: f32, input: Controls) {
        let intent = self.avatar.control(&mut self.engine, input);
        if let Some((from, facing)) = intent.fire_from {
            self.fireballs.fire(&mut self.engine, from, facing);
        }
        if intent.spawn_carrot {
            let around = self.avatar.position(&self.engine);
            self.carrots.spawn(&mut self.engine, around);
        }
        self.carrots.steer(&mut self.engine, &self.terrain);

        let contacts = self.engine.update(dt);
        self.collisions(&contacts);
        self.avatar.settle(&mut self.engine, &self.terrain);
        self.stream();
        self.dispatch();

        let sky = self.day.advance(dt);
        if let Some(sun) = self.engine.objects.get_mut(self.sun) {
            sun.set_center(sky.sun_center);
        }
        if let Some(night) = self.engine.objects.get_mut(self.night) {
            night.opacity = sky.night_opacity;
        }
        self.frame += 1;
    }

    fn collisions(&mut self, contacts: &[Collision]) {
        for c in contacts {
            if let Some((leaf, _, other)) = c.side(LEAF_TAG) {
                if other == GROUND_TAG {
                    self.trees.on_leaf_ground_contact(&mut self.engine, leaf);
                }
            } else if let (Some((carrot, _, _)), Some((fireball, _, _))) = (c.side(CARROT_TAG), c.side(FIREBALL_TAG)) {
                if self.carrots.destroy(&mut self.engine, carrot) {
                    self.fireballs.expire(&mut self.engine, fireball);
                }
            }
        }
    }

    fn dispatch(&mut self) {
        while let Some(due) = self.engine.pop_due() {
            log_event(self.engine.now_secs(), due.owner, &due.task);
            match (due.task, due.owner) {
                (Event::CarrotRoundEnded, _) => self.carrots.end_round(&mut self.engine),
                (Event::CarrotExpired, Some(id)) => {
                    self.carrots.expire(&mut self.engine, id);
                }
                (Event::FireballExpired, Some(id)) => {
                    self.fireballs.expire(&mut self.engine, id);
                }
                (ev, Some(id)) => self.trees.handle_event(&mut self.engine, id, ev),
                (ev, None) => debug!(target: "events", "{:?} without owner", ev),
            }
        }
    }

    /// Teleports the avatar and streams the destination in one batch.
    pub fn warp_avatar(&mut self, x: f32) {
        self.avatar.warp(&mut self.engine, &self.terrain, x);
        info!(target: "avatar", "warped to x={}", x);
        self.stream();
    }

    pub fn stats(&self) -> Stats {
        Stats {
            frame: self.frame,
            time: self.engine.now_secs(),
            avatar_x: self.avatar.position(&self.engine).x,
            energy: self.avatar.energy(),
            objects: self.engine.objects.len(),
            columns: self.terrain.materialized_len(),
            trees: self.trees.live_len(),
            leaves: self.trees.leaves().len(),
            cached_tree_columns: self.trees.cached_len(),
            pending_tasks: self.engine.scheduler.len(),
            carrots: self.carrots.live_len(),
            fireballs: self.fireballs.live_len(),
            destroyed: self.carrots.destroyed(),
            high_score: self.carrots.high_score(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn trees(&self) -> &Trees {
        &self.trees
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn window(&self) -> &StreamWindow {
        &self.window
    }

    pub fn context(&self) -> &WorldContext {
        &self.ctx
    }

    pub fn carrots(&self) -> &Carrots {
        &self.carrots
    }
}
