use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cell, CellRegistry};

/// Grid tile edge in degrees (roughly 11m at the equator).
pub const TILE_SIZE: f64 = 1e-4;

/// A geographic point. Serializes as `[lat, lng]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<LatLng> for (f64, f64) {
    fn from(value: LatLng) -> Self {
        (value.lat, value.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordError {
    NonFinite { lat: f64, lng: f64 },
    OutOfRange { lat: f64, lng: f64 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::NonFinite { lat, lng } => {
                write!(f, "non-finite coordinate ({}, {})", lat, lng)
            }
            CoordError::OutOfRange { lat, lng } => {
                write!(f, "coordinate ({}, {}) is outside the addressable grid", lat, lng)
            }
        }
    }
}

impl std::error::Error for CoordError {}

/// Converts between geographic points and grid cells with a fixed tile size.
#[derive(Clone, Copy, Debug)]
pub struct CoordMapper {
    tile_size: f64,
}

impl Default for CoordMapper {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
        }
    }
}

impl CoordMapper {
    pub fn new(tile_size: f64) -> Self {
        Self { tile_size }
    }

    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Maps a point to the cell containing it and interns that cell.
    ///
    /// Uses `floor` on both axes, so points on a tile's south/west edge
    /// belong to that tile and negative coordinates round away from zero.
    pub fn to_cell(
        &self,
        registry: &mut CellRegistry,
        lat: f64,
        lng: f64,
    ) -> Result<Cell, CoordError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordError::NonFinite { lat, lng });
        }
        let fi = (lat / self.tile_size).floor();
        let fj = (lng / self.tile_size).floor();
        let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
        if !range.contains(&fi) || !range.contains(&fj) {
            return Err(CoordError::OutOfRange { lat, lng });
        }
        Ok(registry.cell(fi as i32, fj as i32))
    }

    /// South-west anchor point of `cell`.
    #[inline]
    pub fn to_lat_lng(&self, cell: Cell) -> LatLng {
        LatLng::new(
            f64::from(cell.i) * self.tile_size,
            f64::from(cell.j) * self.tile_size,
        )
    }
}
