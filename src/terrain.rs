use hashbrown::HashMap;
use log::debug;
use pepse_geom::Vec2;
use pepse_runtime::{EntityId, GameObject, Layer, Tag};
use pepse_world::{GridRange, HeightField};

use crate::Engine;
use crate::world::WorldContext;

pub const GROUND_TAG: Tag = Tag("ground");
/// Sub-surface columns.
pub const GROUND_LAYER: Layer = Layer::STATIC_OBJECTS;
/// Top block of each column; the layer falling leaves collide with.
pub const SURFACE_LAYER: Layer = Layer::STATIC_OBJECTS.offset(1);

/// Streams ground columns in and out of the engine.
///
/// `materialized` maps the grid x of every column to the blocks registered for
/// it. Both operations keep it in lockstep with the live objects:
/// `create_in_range` marks a column only when it adds its blocks, and
/// `delete_in_range` removes exactly the blocks of the columns it unmarks.
/// Blocks are owned by column key rather than matched by `f32` position, which
/// stops resolving single blocks far from the origin.
pub struct Terrain {
    heights: HeightField,
    block: i32,
    depth: i32,
    materialized: HashMap<i32, Vec<EntityId>>,
}

impl Terrain {
    pub fn new(ctx: &WorldContext) -> Self {
        Self {
            heights: HeightField::new(ctx.seed, ctx.window.y, &ctx.params),
            block: ctx.params.block_size,
            depth: ctx.params.terrain_depth,
            materialized: HashMap::new(),
        }
    }

    #[inline]
    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.heights.ground_height_at(x)
    }

    #[inline]
    pub fn block_size(&self) -> i32 {
        self.block
    }

    /// Materializes every missing column at aligned x in `[min_x, max_x)`.
    /// Returns the number of columns created.
    pub fn create_in_range(&mut self, engine: &mut Engine, min_x: i32, max_x: i32) -> usize {
        let size = Vec2::splat(self.block as f32);
        let mut created = 0;
        for x in GridRange::half_open(min_x, max_x, self.block) {
            if self.materialized.contains_key(&x) {
                continue;
            }
            let fx = x as f32;
            let top = self.heights.ground_height_at(fx);
            let mut blocks = Vec::with_capacity(self.blocks_per_column());
            blocks.push(engine.add(
                GameObject::new(Vec2::new(fx, top), size).with_tag(GROUND_TAG).immovable(),
                SURFACE_LAYER,
            ));
            for j in 1..=self.depth {
                let y = top + (j * self.block) as f32;
                blocks.push(engine.add(
                    GameObject::new(Vec2::new(fx, y), size).with_tag(GROUND_TAG).immovable(),
                    GROUND_LAYER,
                ));
            }
            self.materialized.insert(x, blocks);
            created += 1;
        }
        if created > 0 {
            debug!(target: "stream", "terrain +{} columns in [{}, {})", created, min_x, max_x);
        }
        created
    }

    /// Removes every column whose x lies in the closed range `[min_x, max_x]`.
    /// A degenerate range (`min_x >= max_x`) removes nothing. Returns the number of
    /// columns unmarked.
    pub fn delete_in_range(&mut self, engine: &mut Engine, min_x: i32, max_x: i32) -> usize {
        if min_x >= max_x {
            return 0;
        }
        // walk the set rather than the range, which may span the whole i32 line
        let mut doomed: Vec<i32> = self
            .materialized
            .keys()
            .copied()
            .filter(|&x| x >= min_x && x <= max_x)
            .collect();
        doomed.sort_unstable();
        let unmarked = doomed.len();
        let mut blocks = 0;
        for x in doomed {
            for id in self.materialized.remove(&x).unwrap_or_default() {
                if engine.remove(id) {
                    blocks += 1;
                }
            }
        }
        if unmarked > 0 {
            debug!(
                target: "stream",
                "terrain -{} columns ({} blocks) in [{}, {}]",
                unmarked, blocks, min_x, max_x
            );
        }
        unmarked
    }

    #[inline]
    pub fn is_materialized(&self, x: i32) -> bool {
        self.materialized.contains_key(&x)
    }

    pub fn materialized_len(&self) -> usize {
        self.materialized.len()
    }

    /// Materialized column x values, ascending.
    pub fn columns(&self) -> Vec<i32> {
        let mut xs: Vec<i32> = self.materialized.keys().copied().collect();
        xs.sort_unstable();
        xs
    }

    /// Blocks per column, surface included.
    #[inline]
    pub fn blocks_per_column(&self) -> usize {
        self.depth as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn setup() -> (Terrain, Engine) {
        let ctx = WorldContext::from_config(&GameConfig::default());
        (Terrain::new(&ctx), Engine::new())
    }

    fn live_blocks(engine: &Engine) -> usize {
        engine.objects.count_in_layer(GROUND_LAYER) + engine.objects.count_in_layer(SURFACE_LAYER)
    }

    #[test]
    fn create_is_half_open_and_idempotent() {
        let (mut t, mut e) = setup();
        assert_eq!(t.create_in_range(&mut e, 0, 90), 3);
        assert_eq!(t.columns(), vec![0, 30, 60]);
        assert_eq!(t.create_in_range(&mut e, 0, 120), 1);
        assert_eq!(t.create_in_range(&mut e, 0, 120), 0);
        assert_eq!(live_blocks(&e), 4 * t.blocks_per_column());
    }

    #[test]
    fn column_layout_matches_height() {
        let (mut t, mut e) = setup();
        t.create_in_range(&mut e, -30, 0);
        let top = t.ground_height_at(-30.0);
        let surface: Vec<_> = e.objects.objects_in_layer(SURFACE_LAYER).collect();
        assert_eq!(surface.len(), 1);
        let s = e.objects.get(surface[0]).unwrap();
        assert_eq!(s.position, Vec2::new(-30.0, top));
        assert_eq!(s.tag, GROUND_TAG);
        assert!(s.is_immovable());
        let mut ys: Vec<f32> = e
            .objects
            .objects_in_layer(GROUND_LAYER)
            .filter_map(|id| e.objects.get(id).map(|o| o.position.y))
            .collect();
        ys.sort_by(f32::total_cmp);
        assert_eq!(ys.len(), 20);
        assert_eq!(ys[0], top + 30.0);
        assert_eq!(ys[19], top + 600.0);
    }

    #[test]
    fn delete_is_closed_and_keeps_set_in_sync() {
        let (mut t, mut e) = setup();
        t.create_in_range(&mut e, 0, 300);
        assert_eq!(t.delete_in_range(&mut e, 60, 120), 3);
        assert!(!t.is_materialized(60) && !t.is_materialized(90) && !t.is_materialized(120));
        assert!(t.is_materialized(30) && t.is_materialized(150));
        assert_eq!(live_blocks(&e), t.materialized_len() * t.blocks_per_column());
    }

    #[test]
    fn degenerate_delete_is_noop() {
        let (mut t, mut e) = setup();
        t.create_in_range(&mut e, 0, 90);
        assert_eq!(t.delete_in_range(&mut e, 30, 30), 0);
        assert_eq!(t.delete_in_range(&mut e, 60, 0), 0);
        assert_eq!(t.materialized_len(), 3);
        assert_eq!(live_blocks(&e), 3 * t.blocks_per_column());
    }

    #[test]
    fn negative_coordinates_work() {
        let (mut t, mut e) = setup();
        assert_eq!(t.create_in_range(&mut e, -95, -29), 3);
        assert_eq!(t.columns(), vec![-90, -60, -30]);
        assert_eq!(t.delete_in_range(&mut e, -1000, -60), 2);
        assert_eq!(t.columns(), vec![-30]);
    }

    #[test]
    fn ranges_at_the_ends_of_i32() {
        let (mut t, mut e) = setup();
        assert_eq!(t.create_in_range(&mut e, i32::MAX - 5, i32::MAX), 0);
        assert_eq!(t.create_in_range(&mut e, i32::MAX - 100, i32::MAX), 4);
        assert_eq!(t.create_in_range(&mut e, i32::MIN, i32::MIN + 100), 4);
        assert_eq!(live_blocks(&e), 8 * t.blocks_per_column());
        assert_eq!(t.delete_in_range(&mut e, i32::MAX - 100, i32::MAX), 4);
        assert_eq!(t.delete_in_range(&mut e, i32::MIN, i32::MIN + 100), 4);
        assert_eq!(t.materialized_len(), 0);
        assert_eq!(live_blocks(&e), 0);
    }

    #[test]
    fn delete_over_the_whole_line_is_cheap() {
        let (mut t, mut e) = setup();
        t.create_in_range(&mut e, -300, 300);
        assert_eq!(t.delete_in_range(&mut e, i32::MIN, i32::MAX), 20);
        assert_eq!(live_blocks(&e), 0);
    }
}
