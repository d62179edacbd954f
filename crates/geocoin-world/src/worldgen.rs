use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use geocoin_grid::{LatLng, TILE_SIZE};

/// Largest visibility radius accepted from config or the command line.
pub const MAX_VISIBILITY_RADIUS: i32 = 64;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_tile_size")]
    pub tile_size: f64,
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,
    #[serde(default = "default_visibility_radius")]
    pub visibility_radius: i32,
    #[serde(default)]
    pub coins: Coins,
    #[serde(default)]
    pub start: Start,
    // Fixed RNG seed for cache sizes; None draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            spawn_probability: default_spawn_probability(),
            visibility_radius: default_visibility_radius(),
            coins: Coins::default(),
            start: Start::default(),
            seed: None,
        }
    }
}

fn default_tile_size() -> f64 {
    TILE_SIZE
}
fn default_spawn_probability() -> f64 {
    0.1
}
fn default_visibility_radius() -> i32 {
    8
}

/// Inclusive range for the number of coins a fresh cache starts with.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Coins {
    #[serde(default = "default_coins_min")]
    pub min: u32,
    #[serde(default = "default_coins_max")]
    pub max: u32,
}
fn default_coins_min() -> u32 {
    1
}
fn default_coins_max() -> u32 {
    5
}
impl Default for Coins {
    fn default() -> Self {
        Self {
            min: default_coins_min(),
            max: default_coins_max(),
        }
    }
}

/// Where a player without a save file begins.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Start {
    #[serde(default = "default_start_lat")]
    pub lat: f64,
    #[serde(default = "default_start_lng")]
    pub lng: f64,
}
fn default_start_lat() -> f64 {
    36.98949379578401
}
fn default_start_lng() -> f64 {
    -122.06277128548504
}
impl Default for Start {
    fn default() -> Self {
        Self {
            lat: default_start_lat(),
            lng: default_start_lng(),
        }
    }
}

impl Start {
    #[inline]
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Replaces values the engine cannot work with by their defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            log::warn!("tile_size {} is invalid; using {}", self.tile_size, TILE_SIZE);
            self.tile_size = default_tile_size();
        }
        if self.spawn_probability.is_nan() {
            log::warn!("spawn_probability is NaN; using default");
            self.spawn_probability = default_spawn_probability();
        }
        if self.visibility_radius < 0 {
            log::warn!("visibility_radius {} < 0; using 0", self.visibility_radius);
            self.visibility_radius = 0;
        } else if self.visibility_radius > MAX_VISIBILITY_RADIUS {
            log::warn!(
                "visibility_radius {} > {}; clamping",
                self.visibility_radius,
                MAX_VISIBILITY_RADIUS
            );
            self.visibility_radius = MAX_VISIBILITY_RADIUS;
        }
        if self.coins.min > self.coins.max {
            log::warn!(
                "coins.min {} > coins.max {}; swapping",
                self.coins.min,
                self.coins.max
            );
            std::mem::swap(&mut self.coins.min, &mut self.coins.max);
        }
        if !(self.start.lat.is_finite() && self.start.lng.is_finite()) {
            log::warn!("start location is not finite; using default");
            self.start = Start::default();
        }
        self
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldGenConfig::from_toml_str(&s)
}

/// Loads `path` if it exists, otherwise falls back to defaults. Parse errors
/// are logged and also fall back.
pub fn load_config_or_default(path: &Path) -> WorldGenConfig {
    if !path.exists() {
        log::info!("world config {} not found; using defaults", path.display());
        return WorldGenConfig::default();
    }
    match load_config_from_path(path) {
        Ok(cfg) => {
            log::info!("world config loaded from {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("world config {} unusable ({}); using defaults", path.display(), e);
            WorldGenConfig::default()
        }
    }
}
