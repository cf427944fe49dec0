use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_block_size")]
    pub block_size: i32,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub trees: Trees,
    #[serde(default)]
    pub leaves: Leaves,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            terrain: Terrain::default(),
            trees: Trees::default(),
            leaves: Leaves::default(),
        }
    }
}

fn default_block_size() -> i32 {
    30
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_height_factor")]
    pub height_factor: f32,
    #[serde(default = "default_depth")]
    pub depth: i32,
    #[serde(default = "default_noise_freq")]
    pub noise_frequency: f32,
    #[serde(default = "default_noise_amp")]
    pub noise_amplitude: f32,
}
fn default_height_factor() -> f32 {
    0.75
}
fn default_depth() -> i32 {
    20
}
fn default_noise_freq() -> f32 {
    0.05
}
fn default_noise_amp() -> f32 {
    0.15
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            height_factor: default_height_factor(),
            depth: default_depth(),
            noise_frequency: default_noise_freq(),
            noise_amplitude: default_noise_amp(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_tree_prob")]
    pub probability: f32,
    #[serde(default = "default_base_height")]
    pub base_height: i32,
    #[serde(default = "default_jitter_min")]
    pub height_jitter_min: i32,
    #[serde(default = "default_jitter_max")]
    pub height_jitter_max: i32,
    #[serde(default = "default_canopy")]
    pub canopy_size: i32,
}
fn default_tree_prob() -> f32 {
    0.1
}
fn default_base_height() -> i32 {
    6
}
fn default_jitter_min() -> i32 {
    -2
}
fn default_jitter_max() -> i32 {
    1
}
fn default_canopy() -> i32 {
    5
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            probability: default_tree_prob(),
            base_height: default_base_height(),
            height_jitter_min: default_jitter_min(),
            height_jitter_max: default_jitter_max(),
            canopy_size: default_canopy(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Leaves {
    #[serde(default = "default_fade_out")]
    pub fade_out_time: f32,
    #[serde(default = "default_fall_velocity")]
    pub fall_velocity: f32,
    #[serde(default = "default_swing_period")]
    pub swing_period: f32,
    #[serde(default = "default_angle_amp")]
    pub angle_amplitude: f32,
    #[serde(default = "default_angle_period")]
    pub angle_period: f32,
    #[serde(default = "default_shrink")]
    pub size_shrink: f32,
    #[serde(default = "default_size_period")]
    pub size_period: f32,
    #[serde(default = "default_max_fall_delay")]
    pub max_fall_delay: u32,
    #[serde(default = "default_max_respawn_delay")]
    pub max_respawn_delay: u32,
}
fn default_fade_out() -> f32 {
    10.0
}
fn default_fall_velocity() -> f32 {
    60.0
}
fn default_swing_period() -> f32 {
    0.5
}
fn default_angle_amp() -> f32 {
    20.0
}
fn default_angle_period() -> f32 {
    2.0
}
fn default_shrink() -> f32 {
    5.0
}
fn default_size_period() -> f32 {
    0.5
}
fn default_max_fall_delay() -> u32 {
    60
}
fn default_max_respawn_delay() -> u32 {
    10
}
impl Default for Leaves {
    fn default() -> Self {
        Self {
            fade_out_time: default_fade_out(),
            fall_velocity: default_fall_velocity(),
            swing_period: default_swing_period(),
            angle_amplitude: default_angle_amp(),
            angle_period: default_angle_period(),
            size_shrink: default_shrink(),
            size_period: default_size_period(),
            max_fall_delay: default_max_fall_delay(),
            max_respawn_delay: default_max_respawn_delay(),
        }
    }
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub block_size: i32,
    pub height_factor: f32,
    pub terrain_depth: i32,
    pub noise_frequency: f32,
    pub noise_amplitude: f32,
    pub tree_probability: f32,
    pub tree_base_height: i32,
    pub tree_height_jitter_min: i32,
    pub tree_height_jitter_max: i32,
    pub canopy_size: i32,
    pub leaf_fade_out_time: f32,
    pub leaf_fall_velocity: f32,
    pub leaf_swing_period: f32,
    pub leaf_angle_amplitude: f32,
    pub leaf_angle_period: f32,
    pub leaf_size_shrink: f32,
    pub leaf_size_period: f32,
    pub leaf_max_fall_delay: u32,
    pub leaf_max_respawn_delay: u32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            block_size: cfg.block_size,
            height_factor: cfg.terrain.height_factor,
            terrain_depth: cfg.terrain.depth,
            noise_frequency: cfg.terrain.noise_frequency,
            noise_amplitude: cfg.terrain.noise_amplitude,
            tree_probability: cfg.trees.probability,
            tree_base_height: cfg.trees.base_height,
            tree_height_jitter_min: cfg.trees.height_jitter_min,
            tree_height_jitter_max: cfg.trees.height_jitter_max,
            canopy_size: cfg.trees.canopy_size,
            leaf_fade_out_time: cfg.leaves.fade_out_time,
            leaf_fall_velocity: cfg.leaves.fall_velocity,
            leaf_swing_period: cfg.leaves.swing_period,
            leaf_angle_amplitude: cfg.leaves.angle_amplitude,
            leaf_angle_period: cfg.leaves.angle_period,
            leaf_size_shrink: cfg.leaves.size_shrink,
            leaf_size_period: cfg.leaves.size_period,
            leaf_max_fall_delay: cfg.leaves.max_fall_delay,
            leaf_max_respawn_delay: cfg.leaves.max_respawn_delay,
        }
    }
}

impl WorldGenConfig {
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.block_size <= 0 {
            return Err(format!("block_size must be positive, got {}", self.block_size).into());
        }
        if self.terrain.depth < 0 {
            return Err(format!("terrain.depth must not be negative, got {}", self.terrain.depth).into());
        }
        if !(0.0..=1.0).contains(&self.trees.probability) {
            return Err(format!("trees.probability must be in [0, 1], got {}", self.trees.probability).into());
        }
        if self.trees.height_jitter_max < self.trees.height_jitter_min {
            return Err("trees.height_jitter_max is below trees.height_jitter_min".into());
        }
        if self.trees.canopy_size <= 0 {
            return Err("trees.canopy_size must be positive".into());
        }
        let l = &self.leaves;
        for (name, v) in [
            ("leaves.fade_out_time", l.fade_out_time),
            ("leaves.swing_period", l.swing_period),
            ("leaves.angle_period", l.angle_period),
            ("leaves.size_period", l.size_period),
        ] {
            if !(v > 0.0) {
                return Err(format!("{name} must be positive, got {v}").into());
            }
        }
        Ok(())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(WorldGenParams::from_config(&cfg))
}
