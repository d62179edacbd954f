use hashbrown::HashMap;

use crate::Cell;

/// Canonical identity of an interned cell. Two ids are equal iff they were
/// handed out for the same `(i, j)` by the same registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

#[derive(Default, Debug, Clone, Copy)]
pub struct CellRegistryStats {
    pub interned: usize,
    pub lookups: u64,
    pub hits: u64,
}

/// Session-owned interning table for grid cells.
///
/// Grows monotonically: a cell interned once keeps its id for the life of the
/// registry.
#[derive(Default, Debug)]
pub struct CellRegistry {
    cells: Vec<Cell>,
    by_coord: HashMap<Cell, CellId>,
    lookups: u64,
    hits: u64,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_cell(&mut self, i: i32, j: i32) -> CellId {
        self.lookups += 1;
        let key = Cell::new(i, j);
        if let Some(id) = self.by_coord.get(&key) {
            self.hits += 1;
            return *id;
        }
        let id = CellId(self.cells.len() as u32);
        self.cells.push(key);
        self.by_coord.insert(key, id);
        id
    }

    /// Interns `(i, j)` and hands back the value.
    #[inline]
    pub fn cell(&mut self, i: i32, j: i32) -> Cell {
        let id = self.get_cell(i, j);
        self.cells[id.0 as usize]
    }

    #[inline]
    pub fn resolve(&self, id: CellId) -> Option<Cell> {
        self.cells.get(id.0 as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn stats(&self) -> CellRegistryStats {
        CellRegistryStats {
            interned: self.cells.len(),
            lookups: self.lookups,
            hits: self.hits,
        }
    }
}
