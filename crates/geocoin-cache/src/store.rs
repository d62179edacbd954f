use std::fmt;

use geocoin_grid::Cell;
use geocoin_world::{Coins, SpawnOracle};
use hashbrown::HashMap;
use rand::Rng;

use crate::{CacheMemento, Coin, MementoError};

/// The coins sitting in one cell, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cache {
    coins: Vec<Coin>,
}

impl Cache {
    pub fn from_coins(coins: Vec<Coin>) -> Self {
        Self { coins }
    }

    #[inline]
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn snapshot(&self) -> CacheMemento {
        CacheMemento::from_coins(&self.coins)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    NoCache(Cell),
    NoSuchCoin { cell: Cell, index: usize, len: usize },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::NoCache(cell) => write!(f, "no cache at {}", cell),
            CacheError::NoSuchCoin { cell, index, len } => write!(
                f,
                "no such coin: index {} in cache {} holding {}",
                index, cell, len
            ),
        }
    }
}

impl std::error::Error for CacheError {}

/// A deposit that had nowhere to go. Hands the coin back so the caller can
/// return it to the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRejected {
    pub cell: Cell,
    pub coin: Coin,
}

impl fmt::Display for DepositRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot deposit {}: no cache at {}", self.coin, self.cell)
    }
}

impl std::error::Error for DepositRejected {}

#[derive(Default, Debug, Clone, Copy)]
pub struct CacheStoreStats {
    pub caches: usize,
    pub coins: usize,
    pub originals: usize,
    pub dirty: usize,
}

/// Owns every cache in the world, plus the content each cache was generated
/// with.
///
/// Cells the oracle rejects never get an entry. Entries are never removed.
/// Every mutation bumps a per-cell revision so the persistence layer can tell
/// what changed since the last save.
pub struct CacheStore {
    coins: Coins,
    caches: HashMap<Cell, Cache>,
    originals: HashMap<Cell, Cache>,
    // Change-tracking
    rev: HashMap<Cell, u64>,
    saved: HashMap<Cell, u64>,
    counter: u64,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(Coins::default())
    }
}

impl CacheStore {
    pub fn new(mut coins: Coins) -> Self {
        if coins.min > coins.max {
            std::mem::swap(&mut coins.min, &mut coins.max);
        }
        Self {
            coins,
            caches: HashMap::new(),
            originals: HashMap::new(),
            rev: HashMap::new(),
            saved: HashMap::new(),
            counter: 0,
        }
    }

    pub fn stats(&self) -> CacheStoreStats {
        CacheStoreStats {
            caches: self.caches.len(),
            coins: self.caches.values().map(Cache::len).sum(),
            originals: self.originals.len(),
            dirty: self.dirty_cells().len(),
        }
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> Option<&Cache> {
        self.caches.get(&cell)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Cache)> {
        self.caches.iter().map(|(c, cache)| (*c, cache))
    }

    /// Returns the cache at `cell`, generating it on first sight if the
    /// oracle places one there. The coin count is drawn from `rng` once; the
    /// oracle only decides existence.
    pub fn ensure<R: Rng>(
        &mut self,
        cell: Cell,
        oracle: &SpawnOracle,
        rng: &mut R,
    ) -> Option<&Cache> {
        if !self.caches.contains_key(&cell) {
            if !oracle.should_spawn(cell) {
                return None;
            }
            let n = rng.random_range(self.coins.min..=self.coins.max);
            let cache = Cache::from_coins((0..n).map(|s| Coin::new(cell, s)).collect());
            log::debug!("spawned cache {} with {} coin(s)", cell, n);
            self.originals.insert(cell, cache.clone());
            self.caches.insert(cell, cache);
            self.bump(cell);
        }
        self.caches.get(&cell)
    }

    /// Removes the coin at `index`. Nothing changes on error.
    pub fn collect(&mut self, cell: Cell, index: usize) -> Result<Coin, CacheError> {
        let cache = self.caches.get_mut(&cell).ok_or(CacheError::NoCache(cell))?;
        if index >= cache.coins.len() {
            return Err(CacheError::NoSuchCoin {
                cell,
                index,
                len: cache.coins.len(),
            });
        }
        let coin = cache.coins.remove(index);
        self.bump(cell);
        Ok(coin)
    }

    /// Appends `coin` to the cache at `cell`, keeping its identity.
    pub fn deposit(&mut self, cell: Cell, coin: Coin) -> Result<(), DepositRejected> {
        let Some(cache) = self.caches.get_mut(&cell) else {
            return Err(DepositRejected { cell, coin });
        };
        cache.coins.push(coin);
        self.bump(cell);
        Ok(())
    }

    pub fn snapshot(&self, cell: Cell) -> Option<CacheMemento> {
        self.caches.get(&cell).map(Cache::snapshot)
    }

    /// Replaces (or creates) the entry at `cell` from a snapshot. Never
    /// rolls new content, and does not count as a change to persist.
    pub fn restore(&mut self, cell: Cell, memento: &CacheMemento) -> Result<(), MementoError> {
        let cache = memento.to_cache()?;
        self.caches.insert(cell, cache);
        let rev = self.rev.get(&cell).copied().unwrap_or(0);
        self.saved.insert(cell, rev);
        Ok(())
    }

    /// Records what `cell` looked like when first generated.
    pub fn set_original(
        &mut self,
        cell: Cell,
        memento: &CacheMemento,
    ) -> Result<(), MementoError> {
        let cache = memento.to_cache()?;
        self.originals.insert(cell, cache);
        Ok(())
    }

    pub fn original(&self, cell: Cell) -> Option<CacheMemento> {
        self.originals.get(&cell).map(Cache::snapshot)
    }

    pub fn originals(&self) -> HashMap<Cell, CacheMemento> {
        self.originals
            .iter()
            .map(|(c, cache)| (*c, cache.snapshot()))
            .collect()
    }

    /// Puts every cache back to its generated content.
    pub fn reset_all(&mut self) {
        let cells: Vec<Cell> = self.originals.keys().copied().collect();
        for cell in cells {
            if let Some(orig) = self.originals.get(&cell) {
                self.caches.insert(cell, orig.clone());
            }
            self.bump(cell);
        }
        log::info!("reset {} cache(s) to original content", self.originals.len());
    }

    /// Like [`reset_all`](Self::reset_all) but from an explicit set of
    /// originals, which replace the recorded ones. All snapshots are checked
    /// before anything is applied.
    pub fn reset_all_from(
        &mut self,
        originals: &HashMap<Cell, CacheMemento>,
    ) -> Result<(), MementoError> {
        let parsed = originals
            .iter()
            .map(|(c, m)| m.to_cache().map(|cache| (*c, cache)))
            .collect::<Result<Vec<_>, _>>()?;
        for (cell, cache) in parsed {
            self.originals.insert(cell, cache);
        }
        self.reset_all();
        Ok(())
    }

    fn bump(&mut self, cell: Cell) {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.rev.insert(cell, self.counter);
    }

    /// Cells changed since the last [`mark_saved`](Self::mark_saved).
    pub fn dirty_cells(&self) -> Vec<Cell> {
        self.rev
            .iter()
            .filter(|(c, r)| self.saved.get(*c).copied().unwrap_or(0) < **r)
            .map(|(c, _)| *c)
            .collect()
    }

    pub fn mark_saved(&mut self) {
        for (c, r) in self.rev.iter() {
            self.saved.insert(*c, *r);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn three_coin_store(cell: Cell) -> CacheStore {
        let mut store = CacheStore::new(Coins { min: 3, max: 3 });
        store.ensure(cell, &SpawnOracle::new(1.0), &mut rng());
        store
    }

    #[test]
    fn rejected_cell_gets_no_entry() {
        let mut store = CacheStore::default();
        let c = Cell::new(3, 6);
        assert!(store.ensure(c, &SpawnOracle::new(0.0), &mut rng()).is_none());
        assert!(store.get(c).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn ensure_mints_serials_in_range() {
        let mut store = CacheStore::default();
        let c = Cell::new(1, 2);
        let cache = store.ensure(c, &SpawnOracle::new(1.0), &mut rng()).unwrap();
        assert!((1..=5).contains(&cache.len()));
        for (s, coin) in cache.coins().iter().enumerate() {
            assert_eq!(*coin, Coin::new(c, s as u32));
        }
        assert_eq!(store.original(c), store.snapshot(c));
        assert_eq!(store.dirty_cells(), vec![c]);
    }

    #[test]
    fn ensure_never_rerolls() {
        let c = Cell::new(1, 2);
        let mut store = three_coin_store(c);
        store.collect(c, 0).unwrap();
        let again = store
            .ensure(c, &SpawnOracle::new(1.0), &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn collect_out_of_range_changes_nothing() {
        let c = Cell::new(2, 2);
        let mut store = three_coin_store(c);
        store.mark_saved();
        let before = store.snapshot(c);
        assert_eq!(
            store.collect(c, 3),
            Err(CacheError::NoSuchCoin { cell: c, index: 3, len: 3 })
        );
        assert_eq!(store.snapshot(c), before);
        assert!(store.dirty_cells().is_empty());
        assert_eq!(
            store.collect(Cell::new(0, 0), 0),
            Err(CacheError::NoCache(Cell::new(0, 0)))
        );
    }

    #[test]
    fn collect_then_deposit_keeps_identity() {
        let a = Cell::new(2, 2);
        let b = Cell::new(4, 4);
        let mut store = CacheStore::new(Coins { min: 3, max: 3 });
        let oracle = SpawnOracle::new(1.0);
        store.ensure(a, &oracle, &mut rng());
        store.ensure(b, &oracle, &mut rng());
        let coin = store.collect(a, 1).unwrap();
        assert_eq!(coin.id(), "2:2#1");
        store.deposit(b, coin).unwrap();
        let cache_b = store.get(b).unwrap();
        assert_eq!(cache_b.len(), 4);
        let at = |id: &str| cache_b.coins().iter().position(|c| c.id() == id);
        assert_eq!(at("2:2#1"), Some(3));
        // b still has its own #1, distinct from the deposited one
        assert_eq!(at("4:4#1"), Some(1));
    }

    #[test]
    fn deposit_without_cache_hands_coin_back() {
        let mut store = CacheStore::default();
        let coin = Coin::new(Cell::new(1, 1), 0);
        let err = store.deposit(Cell::new(5, 5), coin).unwrap_err();
        assert_eq!(err.coin, coin);
    }

    #[test]
    fn reset_restores_generated_content() {
        let c = Cell::new(2, 2);
        let mut store = three_coin_store(c);
        let orig = store.snapshot(c).unwrap();
        let coin = store.collect(c, 0).unwrap();
        store.collect(c, 0).unwrap();
        store.deposit(c, coin).unwrap();
        assert_ne!(store.snapshot(c).as_ref(), Some(&orig));
        store.reset_all();
        assert_eq!(store.snapshot(c), Some(orig));
    }

    #[test]
    fn restore_is_clean_and_exact() {
        let c = Cell::new(-7, 3);
        let m = CacheMemento::from_ids(vec!["1:1#4".into(), "-7:3#0".into()]);
        let mut store = CacheStore::default();
        store.restore(c, &m).unwrap();
        assert_eq!(store.snapshot(c), Some(m));
        assert!(store.dirty_cells().is_empty());
    }

    #[test]
    fn reset_from_rejects_bad_snapshot_atomically() {
        let c = Cell::new(2, 2);
        let mut store = three_coin_store(c);
        store.collect(c, 0).unwrap();
        let mut bad = HashMap::new();
        bad.insert(c, CacheMemento::from_ids(vec!["nope".into()]));
        assert!(store.reset_all_from(&bad).is_err());
        assert_eq!(store.get(c).unwrap().len(), 2);
    }

    #[test]
    fn inverted_coin_range_is_normalized() {
        let mut store = CacheStore::new(Coins { min: 4, max: 2 });
        let cache = store.ensure(Cell::new(0, 0), &SpawnOracle::new(1.0), &mut rng()).unwrap();
        assert!((2..=4).contains(&cache.len()));
    }
}
