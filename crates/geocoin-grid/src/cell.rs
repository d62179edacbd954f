use std::fmt;

use serde::{Deserialize, Serialize};

/// One square of the map grid, addressed by integer row `i` (latitude axis)
/// and column `j` (longitude axis).
///
/// Serializes as `[i, j]`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    #[inline]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// `None` when the result would fall off the `i32` grid.
    #[inline]
    pub fn offset(self, di: i32, dj: i32) -> Option<Self> {
        Some(Self {
            i: self.i.checked_add(di)?,
            j: self.j.checked_add(dj)?,
        })
    }

    /// Largest per-axis distance; a cell is inside a square window of radius
    /// `r` around `other` iff this is `<= r`.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> i64 {
        let di = (i64::from(self.i) - i64::from(other.i)).abs();
        let dj = (i64::from(self.j) - i64::from(other.j)).abs();
        di.max(dj)
    }

    /// Storage key, `"{i}:{j}"`.
    pub fn key(self) -> String {
        format!("{}:{}", self.i, self.j)
    }

    pub fn parse_key(key: &str) -> Option<Cell> {
        let (i, j) = key.split_once(':')?;
        Some(Cell::new(i.trim().parse().ok()?, j.trim().parse().ok()?))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.i, self.j)
    }
}

impl From<(i32, i32)> for Cell {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Cell> for (i32, i32) {
    fn from(value: Cell) -> Self {
        (value.i, value.j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parses_back() {
        let c = Cell::new(-12, 400);
        assert_eq!(c.key(), "-12:400");
        assert_eq!(Cell::parse_key(&c.key()), Some(c));
        assert_eq!(Cell::parse_key("12"), None);
        assert_eq!(Cell::parse_key("a:1"), None);
    }

    #[test]
    fn offset_stops_at_grid_edge() {
        let edge = Cell::new(i32::MAX, i32::MIN);
        assert_eq!(edge.offset(1, 0), None);
        assert_eq!(edge.offset(0, -1), None);
        assert_eq!(edge.offset(-1, 1), Some(Cell::new(i32::MAX - 1, i32::MIN + 1)));
    }

    #[test]
    fn chebyshev_uses_largest_axis() {
        let a = Cell::new(0, 0);
        assert_eq!(a.chebyshev(Cell::new(3, -1)), 3);
        assert_eq!(a.chebyshev(Cell::new(-2, 5)), 5);
        assert_eq!(a.chebyshev(a), 0);
    }
}
