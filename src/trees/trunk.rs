use pepse_geom::Vec2;
use pepse_runtime::{EntityId, GameObject};

use super::{TRUNK_LAYER, TRUNK_TAG};
use crate::Engine;

/// Stacks `height` trunk blocks on the ground at `x`, bottom first.
pub fn build(engine: &mut Engine, x: i32, ground: f32, height: i32, block: i32) -> Vec<EntityId> {
    let size = Vec2::splat(block as f32);
    (1..=height)
        .map(|j| {
            let pos = Vec2::new(x as f32, ground - (j * block) as f32);
            engine.add(GameObject::new(pos, size).with_tag(TRUNK_TAG).immovable(), TRUNK_LAYER)
        })
        .collect()
}
