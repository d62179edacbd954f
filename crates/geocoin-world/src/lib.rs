//! Deterministic cache placement and world parameters.
#![forbid(unsafe_code)]

pub mod oracle;
pub mod worldgen;

pub use oracle::{HashFn, SpawnOracle, hash01};
pub use worldgen::{
    Coins, MAX_VISIBILITY_RADIUS, Start, WorldGenConfig, load_config_from_path,
    load_config_or_default,
};
