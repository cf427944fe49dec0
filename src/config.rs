use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use pepse_world::{WorldGenConfig, WorldSeed};

#[derive(Clone, Debug, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_seed")]
    pub seed: WorldSeed,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub world: WorldGenConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub carrots: CarrotConfig,
    #[serde(default)]
    pub fireball: FireballConfig,
    #[serde(default)]
    pub day: DayConfig,
}

fn default_seed() -> WorldSeed {
    9
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            window: WindowConfig::default(),
            stream: StreamConfig::default(),
            world: WorldGenConfig::default(),
            avatar: AvatarConfig::default(),
            carrots: CarrotConfig::default(),
            fireball: FireballConfig::default(),
            day: DayConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f32,
    #[serde(default = "default_window_height")]
    pub height: f32,
}
fn default_window_width() -> f32 {
    800.0
}
fn default_window_height() -> f32 {
    600.0
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    /// Lookahead past the viewport edge, in pixels.
    #[serde(default = "default_buffer")]
    pub buffer: i32,
    /// Tree columns farther than this from the avatar are evicted from the cache.
    #[serde(default = "default_prune_margin")]
    pub prune_margin: i32,
}
fn default_buffer() -> i32 {
    60
}
fn default_prune_margin() -> i32 {
    3000
}
impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer: default_buffer(),
            prune_margin: default_prune_margin(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default = "default_jump_speed")]
    pub jump_speed: f32,
    #[serde(default = "default_max_fall_speed")]
    pub max_fall_speed: f32,
    #[serde(default = "default_max_energy")]
    pub max_energy: f32,
    #[serde(default = "default_energy_step")]
    pub energy_step: f32,
    #[serde(default = "default_fire_cost")]
    pub fire_cost: f32,
    #[serde(default = "default_carrot_chance")]
    pub carrot_spawn_chance: f64,
    #[serde(default = "default_avatar_width")]
    pub width: f32,
    #[serde(default = "default_avatar_height")]
    pub height: f32,
}
fn default_gravity() -> f32 {
    500.0
}
fn default_walk_speed() -> f32 {
    300.0
}
fn default_jump_speed() -> f32 {
    300.0
}
fn default_max_fall_speed() -> f32 {
    500.0
}
fn default_max_energy() -> f32 {
    100.0
}
fn default_energy_step() -> f32 {
    0.5
}
fn default_fire_cost() -> f32 {
    2.0
}
fn default_carrot_chance() -> f64 {
    0.01
}
fn default_avatar_width() -> f32 {
    70.0
}
fn default_avatar_height() -> f32 {
    84.0
}
impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            walk_speed: default_walk_speed(),
            jump_speed: default_jump_speed(),
            max_fall_speed: default_max_fall_speed(),
            max_energy: default_max_energy(),
            energy_step: default_energy_step(),
            fire_cost: default_fire_cost(),
            carrot_spawn_chance: default_carrot_chance(),
            width: default_avatar_width(),
            height: default_avatar_height(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CarrotConfig {
    #[serde(default = "default_carrot_size")]
    pub size: f32,
    #[serde(default = "default_carrot_speed")]
    pub speed: f32,
    #[serde(default = "default_carrot_lifespan")]
    pub lifespan: f32,
    #[serde(default = "default_turn_chance")]
    pub turn_chance: f64,
    #[serde(default = "default_scatter_x")]
    pub scatter_x: i32,
    #[serde(default = "default_scatter_y")]
    pub scatter_y: i32,
    #[serde(default = "default_round_length")]
    pub round_length: f32,
}
fn default_carrot_size() -> f32 {
    30.0
}
fn default_carrot_speed() -> f32 {
    400.0
}
fn default_carrot_lifespan() -> f32 {
    30.0
}
fn default_turn_chance() -> f64 {
    0.05
}
fn default_scatter_x() -> i32 {
    500
}
fn default_scatter_y() -> i32 {
    300
}
fn default_round_length() -> f32 {
    60.0
}
impl Default for CarrotConfig {
    fn default() -> Self {
        Self {
            size: default_carrot_size(),
            speed: default_carrot_speed(),
            lifespan: default_carrot_lifespan(),
            turn_chance: default_turn_chance(),
            scatter_x: default_scatter_x(),
            scatter_y: default_scatter_y(),
            round_length: default_round_length(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct FireballConfig {
    #[serde(default = "default_fireball_width")]
    pub width: f32,
    #[serde(default = "default_fireball_height")]
    pub height: f32,
    #[serde(default = "default_fireball_speed")]
    pub speed: f32,
    #[serde(default = "default_fireball_lifespan")]
    pub lifespan: f32,
}
fn default_fireball_width() -> f32 {
    150.0
}
fn default_fireball_height() -> f32 {
    50.0
}
fn default_fireball_speed() -> f32 {
    500.0
}
fn default_fireball_lifespan() -> f32 {
    7.0
}
impl Default for FireballConfig {
    fn default() -> Self {
        Self {
            width: default_fireball_width(),
            height: default_fireball_height(),
            speed: default_fireball_speed(),
            lifespan: default_fireball_lifespan(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DayConfig {
    #[serde(default = "default_cycle_length")]
    pub cycle_length: f32,
    #[serde(default = "default_sun_size")]
    pub sun_size: f32,
}
fn default_cycle_length() -> f32 {
    30.0
}
fn default_sun_size() -> f32 {
    200.0
}
impl Default for DayConfig {
    fn default() -> Self {
        Self {
            cycle_length: default_cycle_length(),
            sun_size: default_sun_size(),
        }
    }
}

fn require_positive(name: &str, v: f32) -> Result<(), Box<dyn Error>> {
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(format!("{name} must be positive, got {v}").into())
    }
}

fn require_probability(name: &str, p: f64) -> Result<(), Box<dyn Error>> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(format!("{name} must be in [0, 1], got {p}").into())
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: GameConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        self.world.validate()?;
        require_positive("window.width", self.window.width)?;
        require_positive("window.height", self.window.height)?;
        if self.stream.buffer <= 0 {
            return Err(format!("stream.buffer must be positive, got {}", self.stream.buffer).into());
        }
        if self.stream.buffer < self.world.block_size {
            return Err(format!(
                "stream.buffer ({}) must be at least world.block_size ({})",
                self.stream.buffer, self.world.block_size
            )
            .into());
        }
        if self.stream.prune_margin < 0 {
            return Err("stream.prune_margin must not be negative".into());
        }
        let a = &self.avatar;
        require_positive("avatar.width", a.width)?;
        require_positive("avatar.height", a.height)?;
        require_positive("avatar.max_energy", a.max_energy)?;
        require_probability("avatar.carrot_spawn_chance", a.carrot_spawn_chance)?;
        let c = &self.carrots;
        require_positive("carrots.size", c.size)?;
        require_positive("carrots.lifespan", c.lifespan)?;
        require_positive("carrots.round_length", c.round_length)?;
        require_probability("carrots.turn_chance", c.turn_chance)?;
        if c.scatter_x <= 0 || c.scatter_y <= 0 {
            return Err("carrots.scatter_x and carrots.scatter_y must be positive".into());
        }
        require_positive("fireball.lifespan", self.fireball.lifespan)?;
        require_positive("day.cycle_length", self.day.cycle_length)?;
        Ok(())
    }
}
