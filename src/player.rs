use std::fmt;
use std::str::FromStr;

use geocoin_cache::Coin;
use geocoin_grid::{Cell, CellRegistry, CoordMapper, LatLng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Grid step as `(di, dj)`; rows grow northward, columns eastward.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            other => Err(format!("unknown direction {:?}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    cell: Cell,
    inventory: Vec<Coin>,
    history: Vec<LatLng>, // append-only
}

impl Player {
    pub fn new(cell: Cell, anchor: LatLng) -> Self {
        Self {
            cell,
            inventory: Vec::new(),
            history: vec![anchor],
        }
    }

    /// Rebuilds a player from saved parts. An empty history is seeded with
    /// `anchor` so the trail always has a starting point.
    pub fn restore(
        cell: Cell,
        inventory: Vec<Coin>,
        mut history: Vec<LatLng>,
        anchor: LatLng,
    ) -> Self {
        if history.is_empty() {
            history.push(anchor);
        }
        Self {
            cell,
            inventory,
            history,
        }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    #[inline]
    pub fn inventory(&self) -> &[Coin] {
        &self.inventory
    }

    #[inline]
    pub fn history(&self) -> &[LatLng] {
        &self.history
    }

    /// Moves exactly one cell and records the new cell's anchor. Returns
    /// `None`, changing nothing, when the step would leave the grid.
    pub fn step(
        &mut self,
        dir: Direction,
        registry: &mut CellRegistry,
        mapper: &CoordMapper,
    ) -> Option<Cell> {
        let (di, dj) = dir.delta();
        let next = self.cell.offset(di, dj)?;
        self.cell = registry.cell(next.i, next.j);
        self.history.push(mapper.to_lat_lng(self.cell));
        Some(self.cell)
    }

    /// Jumps to `cell`, recording the reported point itself.
    pub fn relocate(&mut self, cell: Cell, point: LatLng) {
        self.cell = cell;
        self.history.push(point);
    }

    pub fn add_coin(&mut self, coin: Coin) {
        self.inventory.push(coin);
    }

    /// Takes `coin` out of the inventory along with the slot it held.
    /// No-op (returns `None`) when the coin is not held.
    pub fn remove_coin(&mut self, coin: &Coin) -> Option<(usize, Coin)> {
        let idx = self.inventory.iter().position(|c| c == coin)?;
        Some((idx, self.inventory.remove(idx)))
    }

    /// Puts a coin back into the slot [`remove_coin`](Self::remove_coin)
    /// reported.
    pub fn return_coin(&mut self, slot: usize, coin: Coin) {
        let slot = slot.min(self.inventory.len());
        self.inventory.insert(slot, coin);
    }

    pub fn find_coin(&self, id: &str) -> Option<Coin> {
        self.inventory.iter().find(|c| c.id() == id).copied()
    }

    pub fn last_coin(&self) -> Option<Coin> {
        self.inventory.last().copied()
    }

    pub fn clear_inventory(&mut self) -> Vec<Coin> {
        std::mem::take(&mut self.inventory)
    }
}
