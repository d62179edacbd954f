//! Grid cells, cell interning, and geographic coordinate mapping.
#![forbid(unsafe_code)]

mod cell;
pub mod coord;
pub mod registry;

pub use cell::Cell;
pub use coord::{CoordError, CoordMapper, LatLng, TILE_SIZE};
pub use registry::{CellId, CellRegistry, CellRegistryStats};
