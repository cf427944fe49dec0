use crate::WorldSeed;
use crate::noise::NoiseGenerator;
use crate::worldgen::WorldGenParams;

/// Pure `x -> ground height` mapping.
///
/// `height(x) = window_height * (height_factor - noise(x / block_size))`, so the
/// baseline sits at `height_factor` of the viewport and undulation is measured in
/// block units. Nothing is stored; every query recomputes from the seed.
pub struct HeightField {
    noise: NoiseGenerator,
    window_height: f32,
    block_size: f32,
    height_factor: f32,
}

impl HeightField {
    pub fn new(seed: WorldSeed, window_height: f32, params: &WorldGenParams) -> Self {
        Self {
            noise: NoiseGenerator::new(seed, params.noise_frequency, params.noise_amplitude),
            window_height,
            block_size: params.block_size as f32,
            height_factor: params.height_factor,
        }
    }

    #[inline]
    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.window_height * (self.height_factor - self.noise.noise(x / self.block_size))
    }

    /// Highest and lowest ground the field can produce (screen space, so `min <= max`).
    pub fn bounds(&self) -> (f32, f32) {
        let a = self.noise.amplitude();
        (
            self.window_height * (self.height_factor - a),
            self.window_height * (self.height_factor + a),
        )
    }

    #[inline]
    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    #[inline]
    pub fn window_height(&self) -> f32 {
        self.window_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: WorldSeed) -> HeightField {
        HeightField::new(seed, 600.0, &WorldGenParams::default())
    }

    #[test]
    fn deterministic_per_seed() {
        let a = field(9);
        let b = field(9);
        for x in (-3000..3000).step_by(30) {
            assert_eq!(a.ground_height_at(x as f32), b.ground_height_at(x as f32));
        }
    }

    #[test]
    fn stays_within_bounds() {
        let f = field(9);
        let (lo, hi) = f.bounds();
        for x in (-30_000..30_000).step_by(15) {
            let h = f.ground_height_at(x as f32);
            assert!(h >= lo - 1e-3 && h <= hi + 1e-3, "h={h} at x={x}");
        }
    }

    #[test]
    fn neighbouring_columns_are_close() {
        let f = field(9);
        let step = f.block_size();
        let mut worst = 0.0f32;
        for i in -1000..1000 {
            let x = i as f32 * step;
            let d = (f.ground_height_at(x + step) - f.ground_height_at(x)).abs();
            worst = worst.max(d);
        }
        // One block of horizontal travel never moves the ground by more than a few blocks.
        assert!(worst < step * 3.0, "worst jump {worst}");
    }
}
