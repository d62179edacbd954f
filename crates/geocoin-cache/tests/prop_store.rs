use std::collections::HashSet;

use geocoin_cache::{Cache, CacheMemento, CacheStore, Coin};
use geocoin_grid::Cell;
use geocoin_world::{Coins, SpawnOracle};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn arb_coin() -> impl Strategy<Value = Coin> {
    (-1000i32..1000, -1000i32..1000, 0u32..64).prop_map(|(i, j, s)| Coin::new(Cell::new(i, j), s))
}

#[derive(Clone, Debug)]
enum Op {
    Collect { cache: usize, index: usize },
    Deposit { cache: usize, slot: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0usize..8).prop_map(|(cache, index)| Op::Collect { cache, index }),
        (0usize..4, 0usize..8).prop_map(|(cache, slot)| Op::Deposit { cache, slot }),
    ]
}

proptest! {
    // snapshot -> restore reproduces the coin list exactly
    #[test]
    fn memento_roundtrip(coins in prop::collection::vec(arb_coin(), 0..16), i in -50i32..50, j in -50i32..50) {
        let cell = Cell::new(i, j);
        let memento = Cache::from_coins(coins.clone()).snapshot();
        let mut store = CacheStore::default();
        store.restore(cell, &memento).unwrap();
        prop_assert_eq!(store.get(cell).unwrap().coins(), &coins[..]);
        prop_assert_eq!(store.snapshot(cell), Some(memento));
    }

    // Collect/deposit moves coins around without creating or losing any
    #[test]
    fn collect_deposit_conserves_coins(seed in any::<u64>(), ops in prop::collection::vec(arb_op(), 0..64)) {
        let cells = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)];
        let mut store = CacheStore::new(Coins { min: 1, max: 5 });
        let oracle = SpawnOracle::new(1.0);
        let mut rng = StdRng::seed_from_u64(seed);
        for c in cells {
            store.ensure(c, &oracle, &mut rng);
        }
        let total = store.stats().coins;
        let mut inventory: Vec<Coin> = Vec::new();
        for op in ops {
            match op {
                Op::Collect { cache, index } => {
                    if let Ok(coin) = store.collect(cells[cache], index) {
                        inventory.push(coin);
                    }
                }
                Op::Deposit { cache, slot } => {
                    if slot < inventory.len() {
                        let coin = inventory.remove(slot);
                        store.deposit(cells[cache], coin).unwrap();
                    }
                }
            }
            prop_assert_eq!(store.stats().coins + inventory.len(), total);
        }
        let mut ids = HashSet::new();
        for (_, cache) in store.iter() {
            for coin in cache.coins() {
                prop_assert!(ids.insert(*coin));
            }
        }
        for coin in &inventory {
            prop_assert!(ids.insert(*coin));
        }
    }

    // Reset always lands on the originally generated content
    #[test]
    fn reset_returns_to_originals(seed in any::<u64>(), ops in prop::collection::vec(arb_op(), 0..32)) {
        let cells = [Cell::new(5, 5), Cell::new(5, 6), Cell::new(6, 5), Cell::new(6, 6)];
        let mut store = CacheStore::default();
        let oracle = SpawnOracle::new(1.0);
        let mut rng = StdRng::seed_from_u64(seed);
        for c in cells {
            store.ensure(c, &oracle, &mut rng);
        }
        let originals: Vec<Option<CacheMemento>> = cells.iter().map(|c| store.snapshot(*c)).collect();
        let mut inventory = Vec::new();
        for op in ops {
            match op {
                Op::Collect { cache, index } => {
                    if let Ok(coin) = store.collect(cells[cache], index) {
                        inventory.push(coin);
                    }
                }
                Op::Deposit { cache, slot } => {
                    if slot < inventory.len() {
                        let coin = inventory.remove(slot);
                        store.deposit(cells[cache], coin).unwrap();
                    }
                }
            }
        }
        store.reset_all();
        let after: Vec<Option<CacheMemento>> = cells.iter().map(|c| store.snapshot(*c)).collect();
        prop_assert_eq!(after, originals);
    }
}
