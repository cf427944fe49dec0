use pepse::trees::leaf::LeafState;
use pepse::{App, Controls, Engine, GameConfig, StreamOp, StreamWindow, Terrain, Trees, WorldContext};
use pepse_world::snap_down;
use proptest::prelude::*;

fn quiet_config(seed: i32) -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.seed = seed;
    cfg.avatar.carrot_spawn_chance = 0.0;
    cfg
}

struct World {
    engine: Engine,
    terrain: Terrain,
    trees: Trees,
    window: StreamWindow,
}

impl World {
    fn new(seed: i32) -> Self {
        let cfg = quiet_config(seed);
        let ctx = WorldContext::from_config(&cfg);
        Self {
            engine: Engine::new(),
            terrain: Terrain::new(&ctx),
            trees: Trees::new(&ctx),
            window: StreamWindow::new(ctx.half_width(), cfg.stream.buffer),
        }
    }

    fn apply(&mut self, ops: Vec<StreamOp>) {
        for op in &ops {
            if let StreamOp::Create { min, max } = *op {
                self.terrain.create_in_range(&mut self.engine, min, max);
                self.trees.create_in_range(&mut self.engine, &self.terrain, min, max);
            }
        }
        for op in &ops {
            if let StreamOp::Delete { min, max } = *op {
                self.terrain.delete_in_range(&mut self.engine, min, max);
                self.trees.delete_in_range(&mut self.engine, min, max);
            }
        }
    }

    fn goto(&mut self, x: i32) {
        let ops = self.window.advance(x);
        self.apply(ops);
    }

    fn ground_blocks(&self) -> usize {
        self.engine.objects.count_in_layer(pepse::terrain::GROUND_LAYER)
            + self.engine.objects.count_in_layer(pepse::terrain::SURFACE_LAYER)
    }
}

#[test]
fn big_step_right_streams_destination() {
    let mut w = World::new(9);
    w.goto(0);
    w.goto(1000);
    for x in (600..=1400).step_by(30) {
        assert!(w.terrain.is_materialized(x), "missing column {x}");
    }
    assert!(w.terrain.columns().iter().all(|&x| x >= -800));
    assert!(w.terrain.columns().iter().all(|&x| x >= 540));
    assert_eq!(w.ground_blocks(), w.terrain.materialized_len() * w.terrain.blocks_per_column());
}

#[test]
fn create_twice_is_create_once() {
    let mut a = World::new(9);
    let mut b = World::new(9);
    a.terrain.create_in_range(&mut a.engine, -300, 700);
    b.terrain.create_in_range(&mut b.engine, -300, 700);
    b.terrain.create_in_range(&mut b.engine, -300, 700);
    assert_eq!(a.terrain.columns(), b.terrain.columns());
    assert_eq!(a.engine.objects.len(), b.engine.objects.len());
}

#[test]
fn footprint_is_bounded_over_a_long_walk() {
    let mut w = World::new(9);
    w.goto(0);
    let mut peak = 0;
    for step in 1..=4000 {
        w.goto(step * 5);
        peak = peak.max(w.engine.objects.len());
        w.trees.prune(step * 5, 2000);
    }
    // 20 km walked; live objects stay within a couple of screens of content
    assert!(w.terrain.materialized_len() <= 40);
    assert!(peak < 40 * 21 + 10 * 40);
    assert!(w.trees.cached_len() < 200);
}

#[test]
fn trees_come_back_identical() {
    let mut w = World::new(9);
    w.goto(0);
    let before: Vec<(i32, i32, usize)> = w
        .trees
        .live_anchors()
        .into_iter()
        .filter(|x| (-400..=400).contains(x))
        .map(|x| (x, w.trees.cached(x).unwrap().height_variation, w.trees.parts(x).unwrap().0.len()))
        .collect();
    w.goto(5000);
    w.trees.prune(5000, 1000);
    assert!(w.trees.live_anchors().iter().all(|&x| x > 4000));
    w.goto(0);
    let after: Vec<(i32, i32, usize)> = w
        .trees
        .live_anchors()
        .into_iter()
        .filter(|x| (-400..=400).contains(x))
        .map(|x| (x, w.trees.cached(x).unwrap().height_variation, w.trees.parts(x).unwrap().0.len()))
        .collect();
    assert!(!before.is_empty());
    assert_eq!(before, after);
}

#[test]
fn stale_leaf_timers_are_dropped() {
    let mut w = World::new(9);
    w.goto(0);
    assert!(!w.trees.leaves().is_empty());
    let pending = w.engine.scheduler.len();
    assert!(pending >= 2 * w.trees.leaves().len());
    w.goto(10_000);
    w.engine.update(100.0);
    let mut ran = 0;
    while let Some(due) = w.engine.pop_due() {
        let owner = due.owner.unwrap();
        assert!(w.engine.objects.contains(owner));
        ran += 1;
    }
    // only leaves of trees around the new anchor survive
    assert!(ran <= 2 * w.trees.leaves().len());
}

#[test]
fn leaves_fall_land_and_return() {
    let mut app = App::new(quiet_config(9)).unwrap();
    let leaves = app.stats().leaves;
    assert!(leaves > 0);
    let mut landed_seen = false;
    // 90 s covers the longest fall delay, the fade and the respawn delay
    for _ in 0..(90 * 20) {
        app.step(0.05, Controls::default());
        let l = app.trees().leaves();
        landed_seen |= l.count_in_state(LeafState::Fading) > 0;
        assert_eq!(l.len(), leaves);
    }
    assert!(landed_seen);
    let trees = app.trees();
    let mut respawned = 0;
    for x in trees.live_anchors() {
        let (_, ids) = trees.parts(x).unwrap();
        for &id in ids {
            let leaf = trees.leaves().get(id).unwrap();
            if leaf.cycles() > 0 {
                respawned += 1;
            }
            if matches!(leaf.state(), LeafState::Dormant | LeafState::Animating) {
                let obj = app.engine().objects.get(id).unwrap();
                assert_eq!(obj.position, leaf.rest());
                assert_eq!(obj.opacity, 1.0);
            }
        }
    }
    assert!(respawned > 0);
}

#[test]
fn walking_app_keeps_window_materialized() {
    // no trunks to block the walk
    let mut cfg = quiet_config(3);
    cfg.world.trees.probability = 0.0;
    let mut app = App::new(cfg).unwrap();
    for _ in 0..600 {
        app.step(1.0 / 60.0, Controls { right: true, ..Controls::default() });
    }
    let anchor = app.window().anchor().unwrap();
    let h = app.window().half_width();
    for x in (snap_down(anchor - h, 30)..=anchor + h).step_by(30) {
        assert!(app.terrain().is_materialized(x), "missing {x} around {anchor}");
    }
    assert!(anchor > 2500);
}

#[test]
fn warp_streams_in_one_batch() {
    let mut app = App::new(quiet_config(9)).unwrap();
    app.warp_avatar(-20_000.0);
    let cols = app.terrain().columns();
    assert!(cols.iter().all(|&x| (-20_460..-19_540).contains(&x)));
    assert!(app.terrain().is_materialized(-20_010));
    assert!(app.trees().live_anchors().iter().all(|&x| x < -19_000));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn window_invariant_holds(moves in proptest::collection::vec(-2500i32..2500, 1..40), start in -5000i32..5000) {
        let mut w = World::new(9);
        let (h, b) = (w.window.half_width(), w.window.buffer());
        let mut x = start;
        w.goto(x);
        for d in moves {
            x += d;
            w.goto(x);
            for col in (snap_down(x - h, 30)..=x + h).step_by(30) {
                prop_assert!(w.terrain.is_materialized(col), "column {} missing at anchor {}", col, x);
            }
            for col in w.terrain.columns() {
                prop_assert!(col >= x - h - 2 * b && col <= x + h + b, "column {} outside window at {}", col, x);
            }
            for t in w.trees.live_anchors() {
                prop_assert!(t >= x - h - 2 * b && t <= x + h + b);
            }
            prop_assert_eq!(w.ground_blocks(), w.terrain.materialized_len() * w.terrain.blocks_per_column());
        }
    }

    #[test]
    fn warps_keep_the_left_edge_column(moves in proptest::collection::vec(-3000i32..3000, 1..6)) {
        let mut app = App::new(quiet_config(9)).unwrap();
        let h = app.window().half_width();
        for d in moves {
            let target = app.avatar().position(app.engine()).x + d as f32;
            app.warp_avatar(target);
            let a = app.window().anchor().unwrap();
            for col in (snap_down(a - h, 30)..=a + h).step_by(30) {
                prop_assert!(app.terrain().is_materialized(col), "missing {} at {}", col, a);
            }
        }
    }
}

#[test]
fn left_edge_column_survives_a_jump_right() {
    let mut w = World::new(9);
    w.goto(400);
    w.goto(1331);
    assert!(w.terrain.is_materialized(930));
    assert!(!w.terrain.is_materialized(870));
}

#[test]
fn streaming_at_the_ends_of_i32() {
    let mut w = World::new(9);
    w.goto(0);
    w.goto(i32::MAX - 100);
    assert!(w.terrain.is_materialized(2_147_483_640));
    assert!(!w.terrain.is_materialized(0));
    w.goto(i32::MIN);
    assert!(w.terrain.is_materialized(-2_147_483_640));
    assert!(w.terrain.columns().iter().all(|&x| x < i32::MIN + 500));
    assert_eq!(w.ground_blocks(), w.terrain.materialized_len() * w.terrain.blocks_per_column());
}

#[test]
fn warp_past_the_i32_range_saturates() {
    let mut app = App::new(quiet_config(9)).unwrap();
    app.warp_avatar(3.0e9);
    assert_eq!(app.window().anchor(), Some(i32::MAX));
    assert!(app.terrain().is_materialized(2_147_483_640));
    assert!(!app.terrain().is_materialized(0));
    for _ in 0..10 {
        app.step(1.0 / 60.0, Controls::default());
    }
    app.warp_avatar(-3.0e9);
    assert_eq!(app.window().anchor(), Some(i32::MIN));
    assert!(app.terrain().is_materialized(-2_147_483_640));
}
