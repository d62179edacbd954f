//! Visibility window: which caches exist around the player right now.
#![forbid(unsafe_code)]

use geocoin_cache::{Cache, CacheStore};
use geocoin_grid::{Cell, CellRegistry};
use geocoin_world::{MAX_VISIBILITY_RADIUS, SpawnOracle};
use rand::Rng;

/// Every cell of the inclusive square of `radius` around `center`, row-major
/// starting from the south-west corner. Cells past the `i32` grid edge are
/// left out.
pub fn window_cells(center: Cell, radius: i32) -> Vec<Cell> {
    let r = radius.max(0);
    let side = 2 * i64::from(r) + 1;
    let cap = usize::try_from(side.saturating_mul(side)).unwrap_or(usize::MAX);
    let mut out = Vec::with_capacity(cap.min(WINDOW_CAPACITY_HINT));
    for di in -r..=r {
        for dj in -r..=r {
            if let Some(cell) = center.offset(di, dj) {
                out.push(cell);
            }
        }
    }
    out
}

// Upper bound on the up-front allocation; larger windows just grow.
const WINDOW_CAPACITY_HINT: usize = 4096;

/// Caches materialized by one regeneration, ready for a renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    pub center: Cell,
    pub radius: i32,
    pub caches: Vec<(Cell, Cache)>,
}

impl VisibleSet {
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn get(&self, cell: Cell) -> Option<&Cache> {
        self.caches
            .iter()
            .find(|(c, _)| *c == cell)
            .map(|(_, cache)| cache)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VisibilityWindow {
    radius: i32,
}

impl VisibilityWindow {
    /// Radius is clamped into `0..=MAX_VISIBILITY_RADIUS`.
    pub fn new(radius: i32) -> Self {
        Self {
            radius: radius.clamp(0, MAX_VISIBILITY_RADIUS),
        }
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn contains(&self, center: Cell, cell: Cell) -> bool {
        center.chebyshev(cell) <= i64::from(self.radius)
    }

    /// Recomputes the whole window around `center`. Existing caches are
    /// taken as stored; unseen cells go through the oracle. Store entries
    /// outside the window are left alone.
    pub fn regenerate<R: Rng>(
        &self,
        center: Cell,
        registry: &mut CellRegistry,
        store: &mut CacheStore,
        oracle: &SpawnOracle,
        rng: &mut R,
    ) -> VisibleSet {
        let before = store.len();
        let mut caches = Vec::new();
        for cell in window_cells(center, self.radius) {
            let cell = registry.cell(cell.i, cell.j);
            if let Some(cache) = store.ensure(cell, oracle, rng) {
                caches.push((cell, cache.clone()));
            }
        }
        log::debug!(
            "window {} r={} -> {} cache(s), {} new",
            center,
            self.radius,
            caches.len(),
            store.len() - before
        );
        VisibleSet {
            center,
            radius: self.radius,
            caches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn window_is_inclusive_square() {
        let cells = window_cells(Cell::new(10, -4), 2);
        assert_eq!(cells.len(), 25);
        assert_eq!(cells[0], Cell::new(8, -6));
        assert_eq!(cells[24], Cell::new(12, -2));
        assert!(cells.contains(&Cell::new(10, -4)));
        assert_eq!(window_cells(Cell::new(0, 0), 0), vec![Cell::new(0, 0)]);
    }

    #[test]
    fn window_skips_cells_off_the_grid() {
        let corner = Cell::new(i32::MAX, i32::MAX);
        let cells = window_cells(corner, 2);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Cell::new(i32::MAX - 2, i32::MAX - 2));
        assert_eq!(cells[8], corner);
    }

    #[test]
    fn oversized_radius_is_clamped() {
        assert_eq!(VisibilityWindow::new(i32::MAX).radius(), MAX_VISIBILITY_RADIUS);
        assert_eq!(VisibilityWindow::new(-5).radius(), 0);
    }

    #[test]
    fn full_probability_fills_window() {
        let w = VisibilityWindow::new(1);
        let mut reg = CellRegistry::new();
        let mut store = CacheStore::default();
        let mut rng = StdRng::seed_from_u64(1);
        let vis = w.regenerate(
            Cell::new(0, 0),
            &mut reg,
            &mut store,
            &SpawnOracle::new(1.0),
            &mut rng,
        );
        assert_eq!(vis.len(), 9);
        assert_eq!(store.len(), 9);
        assert_eq!(reg.len(), 9);
    }

    #[test]
    fn zero_probability_creates_nothing() {
        let w = VisibilityWindow::new(3);
        let mut reg = CellRegistry::new();
        let mut store = CacheStore::default();
        let mut rng = StdRng::seed_from_u64(1);
        let vis = w.regenerate(
            Cell::new(4, 4),
            &mut reg,
            &mut store,
            &SpawnOracle::new(0.0),
            &mut rng,
        );
        assert!(vis.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn moving_away_keeps_store_entries() {
        let w = VisibilityWindow::new(1);
        let mut reg = CellRegistry::new();
        let mut store = CacheStore::default();
        let oracle = SpawnOracle::new(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        w.regenerate(Cell::new(0, 0), &mut reg, &mut store, &oracle, &mut rng);
        let far = w.regenerate(Cell::new(100, 100), &mut reg, &mut store, &oracle, &mut rng);
        assert_eq!(far.len(), 9);
        assert_eq!(store.len(), 18);
        assert!(far.get(Cell::new(0, 0)).is_none());
        assert!(store.get(Cell::new(0, 0)).is_some());
        assert!(!w.contains(far.center, Cell::new(0, 0)));
    }
}
