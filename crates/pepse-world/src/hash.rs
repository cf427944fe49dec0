//! Pure deterministic hashes keyed by world coordinates and the world seed.

use pepse_geom::Vec2;

use crate::WorldSeed;

/// Integer avalanche hash of a 2D lattice point.
#[inline]
pub fn hash2(ix: i32, iy: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iy as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Uniform value in `[0, 1)` for a lattice point; `salt` separates independent decisions.
#[inline]
pub fn rand01(world_seed: WorldSeed, ix: i32, iy: i32, salt: u32) -> f32 {
    let h = hash2(ix, iy, (world_seed as u32 ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for a per-entity random stream, derived from where the entity rests.
///
/// Pure: the same `(position, world_seed)` always yields the same seed, so an entity
/// that is deleted and later recreated at the same spot replays the same stream.
#[inline]
pub fn stream_seed(position: Vec2, world_seed: WorldSeed) -> u64 {
    let key = ((position.x.to_bits() as u64) << 32) | position.y.to_bits() as u64;
    splitmix64(key ^ splitmix64(world_seed as i64 as u64))
}
