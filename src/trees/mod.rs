//! Tree streaming: deterministic placement, trunk columns, and leaf canopies.

pub mod leaf;
pub mod leaves;
pub mod trunk;

use hashbrown::HashMap;
use log::debug;
use pepse_runtime::{EntityId, Layer, Tag};
use pepse_world::{GridRange, TreeSampler};

use crate::Engine;
use crate::event::Event;
use crate::terrain::Terrain;
use crate::world::WorldContext;
use leaf::LeafTiming;
use leaves::Leaves;

pub const TRUNK_TAG: Tag = Tag("trunk");
pub const LEAF_TAG: Tag = Tag("leaf");
pub const TREE_LAYER: Layer = Layer::BACKGROUND.offset(20);
pub const TRUNK_LAYER: Layer = TREE_LAYER.offset(1);
pub const LEAF_LAYER: Layer = TREE_LAYER.offset(2);

struct LiveTree {
    trunk: Vec<EntityId>,
    leaves: Vec<EntityId>,
}

/// Cached decisions for one grid column plus the tree standing there, if any.
pub struct TreeColumn {
    pub possible: bool,
    pub height_variation: i32,
    live: Option<LiveTree>,
}

impl TreeColumn {
    #[inline]
    pub fn exists(&self) -> bool {
        self.live.is_some()
    }
}

pub struct Trees {
    sampler: TreeSampler,
    block: i32,
    columns: HashMap<i32, TreeColumn>,
    leaves: Leaves,
}

impl Trees {
    pub fn new(ctx: &WorldContext) -> Self {
        let p = &ctx.params;
        Self {
            sampler: TreeSampler::new(ctx.seed, p),
            block: p.block_size,
            columns: HashMap::new(),
            leaves: Leaves::new(ctx.seed, p.block_size, p.canopy_size, LeafTiming::from_params(p)),
        }
    }

    fn column(&mut self, x: i32) -> &mut TreeColumn {
        let sampler = &self.sampler;
        self.columns.entry(x).or_insert_with(|| TreeColumn {
            possible: sampler.is_possible(x),
            height_variation: sampler.height_variation(x),
            live: None,
        })
    }

    /// Plants a tree at every aligned x in `[min_x, max_x)` where one is possible
    /// and none stands. Returns the number planted.
    pub fn create_in_range(&mut self, engine: &mut Engine, terrain: &Terrain, min_x: i32, max_x: i32) -> usize {
        let mut planted = 0;
        for x in GridRange::half_open(min_x, max_x, self.block) {
            let block = self.block;
            let col = self.column(x);
            if !col.possible || col.exists() {
                continue;
            }
            let variation = col.height_variation;
            let height = self.sampler.trunk_height(variation);
            let ground = terrain.ground_height_at(x as f32);
            let trunk = trunk::build(engine, x, ground, height, block);
            let leaves = self.leaves.spawn_canopy(engine, x, ground, height);
            if let Some(col) = self.columns.get_mut(&x) {
                col.live = Some(LiveTree { trunk, leaves });
            }
            planted += 1;
        }
        if planted > 0 {
            debug!(target: "trees", "+{} trees in [{}, {})", planted, min_x, max_x);
        }
        planted
    }

    /// Removes every tree anchored at an x in the closed range `[min_x, max_x]`,
    /// canopy included even where it overhangs the range. A degenerate range
    /// removes nothing. Returns the number removed.
    pub fn delete_in_range(&mut self, engine: &mut Engine, min_x: i32, max_x: i32) -> usize {
        if min_x >= max_x {
            return 0;
        }
        let mut doomed: Vec<i32> = self
            .columns
            .iter()
            .filter(|&(&x, col)| x >= min_x && x <= max_x && col.exists())
            .map(|(&x, _)| x)
            .collect();
        doomed.sort_unstable();
        let mut removed = 0;
        for x in doomed {
            let Some(tree) = self.columns.get_mut(&x).and_then(|c| c.live.take()) else {
                continue;
            };
            for id in tree.trunk {
                engine.remove(id);
            }
            self.leaves.despawn(engine, &tree.leaves);
            removed += 1;
        }
        if removed > 0 {
            debug!(target: "trees", "-{} trees in [{}, {}]", removed, min_x, max_x);
        }
        removed
    }

    /// Forgets cached columns without a standing tree farther than `margin` from
    /// `center`. Decisions are pure in `(x, seed)`, so a pruned column resolves
    /// identically when it is visited again.
    pub fn prune(&mut self, center: i32, margin: i32) -> usize {
        let before = self.columns.len();
        self.columns
            .retain(|&x, col| col.exists() || (x as i64 - center as i64).abs() <= margin as i64);
        before - self.columns.len()
    }

    pub fn handle_event(&mut self, engine: &mut Engine, owner: EntityId, ev: Event) {
        self.leaves.handle(engine, owner, ev);
    }

    /// Routes a leaf/ground first contact. Returns true if the leaf landed.
    pub fn on_leaf_ground_contact(&mut self, engine: &mut Engine, leaf: EntityId) -> bool {
        self.leaves.on_ground_contact(engine, leaf)
    }

    pub fn exists(&self, x: i32) -> bool {
        self.columns.get(&x).is_some_and(TreeColumn::exists)
    }

    /// Cached column at `x`, if it was visited and not pruned since.
    pub fn cached(&self, x: i32) -> Option<&TreeColumn> {
        self.columns.get(&x)
    }

    /// Anchor x of every standing tree, ascending.
    pub fn live_anchors(&self) -> Vec<i32> {
        let mut xs: Vec<i32> = self.columns.iter().filter(|(_, c)| c.exists()).map(|(&x, _)| x).collect();
        xs.sort_unstable();
        xs
    }

    /// Trunk and leaf ids of the tree anchored at `x`.
    pub fn parts(&self, x: i32) -> Option<(&[EntityId], &[EntityId])> {
        let tree = self.columns.get(&x)?.live.as_ref()?;
        Some((&tree.trunk, &tree.leaves))
    }

    pub fn live_len(&self) -> usize {
        self.columns.values().filter(|c| c.exists()).count()
    }

    pub fn cached_len(&self) -> usize {
        self.columns.len()
    }

    pub fn leaves(&self) -> &Leaves {
        &self.leaves
    }

    pub fn sampler(&self) -> &TreeSampler {
        &self.sampler
    }
}
