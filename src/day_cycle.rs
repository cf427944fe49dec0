use pepse_geom::Vec2;

/// Sun angle offset so that phase 0 puts the sun at the top of its path.
const SUN_ANGLE_SHIFT: f32 = 90.0;
/// Vertical squash of the sun's ellipse relative to the window height.
const SUN_ELLIPSE_Y_DIV: f32 = 2.5;
const MAX_NIGHT_OPACITY: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DaySample {
    /// Fraction of the cycle elapsed, in `[0, 1)`.
    pub phase: f32,
    /// Sun center in camera space.
    pub sun_center: Vec2,
    /// Opacity of the night overlay: 0 at noon, peaking at midnight.
    pub night_opacity: f32,
}

pub struct DayCycle {
    time: f32,
    day_length: f32,
    window: Vec2,
}

impl DayCycle {
    pub fn new(day_length: f32, window: Vec2) -> Self {
        Self {
            time: 0.0,
            day_length: day_length.max(1.0),
            window,
        }
    }

    pub fn advance(&mut self, dt: f32) -> DaySample {
        self.time = (self.time + dt).rem_euclid(self.day_length);
        self.sample()
    }

    pub fn sample(&self) -> DaySample {
        let phase = (self.time / self.day_length).rem_euclid(1.0);
        let angle = (phase * 360.0 - SUN_ANGLE_SHIFT).to_radians();
        let a = self.window.x / 2.0;
        let b = self.window.y / SUN_ELLIPSE_Y_DIV;
        let sun_center = Vec2::new(a * angle.cos() + self.window.x / 2.0, b * angle.sin() + self.window.y / 2.0);
        let night_opacity = MAX_NIGHT_OPACITY * (1.0 - (2.0 * phase - 1.0).abs());
        DaySample {
            phase,
            sun_center,
            night_opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-2
    }

    #[test]
    fn noon_midnight_and_wrap() {
        let mut d = DayCycle::new(30.0, Vec2::new(800.0, 600.0));
        let noon = d.sample();
        assert!(close(noon.sun_center, Vec2::new(400.0, 60.0)));
        assert_eq!(noon.night_opacity, 0.0);
        let midnight = d.advance(15.0);
        assert!(close(midnight.sun_center, Vec2::new(400.0, 540.0)));
        assert!((midnight.night_opacity - 0.5).abs() < 1e-6);
        let dusk = d.advance(7.5);
        assert!(close(dusk.sun_center, Vec2::new(0.0, 300.0)));
        let wrapped = d.advance(7.5);
        assert!(wrapped.phase < 1e-4);
    }
}
