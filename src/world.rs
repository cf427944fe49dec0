use pepse_geom::Vec2;
use pepse_world::{WorldGenParams, WorldSeed};

use crate::config::GameConfig;

/// Immutable world facts shared by every subsystem at construction.
#[derive(Clone, Debug)]
pub struct WorldContext {
    pub seed: WorldSeed,
    pub window: Vec2,
    pub params: WorldGenParams,
}

impl WorldContext {
    pub fn new(seed: WorldSeed, window: Vec2, params: WorldGenParams) -> Self {
        Self { seed, window, params }
    }

    pub fn from_config(cfg: &GameConfig) -> Self {
        Self::new(
            cfg.seed,
            Vec2::new(cfg.window.width, cfg.window.height),
            WorldGenParams::from_config(&cfg.world),
        )
    }

    #[inline]
    pub fn block_size(&self) -> i32 {
        self.params.block_size
    }

    /// Half the viewport width, the distance from the avatar to either screen edge.
    #[inline]
    pub fn half_width(&self) -> i32 {
        (self.window.x / 2.0) as i32
    }
}
