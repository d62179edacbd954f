use geocoin_cache::CacheStore;
use geocoin_grid::{CellRegistry, CoordMapper};
use geocoin_io::LoadedSnapshot;
use geocoin_world::WorldGenConfig;

use crate::gamestate::{GameState, start_cell};
use crate::player::Player;

impl GameState {
    /// Rebuilds a session from a save, field by field. Anything missing or
    /// unusable falls back to what a fresh session would have.
    pub fn from_saved(cfg: &WorldGenConfig, loaded: LoadedSnapshot) -> Self {
        if loaded.is_first_run() {
            log::info!("no saved game found; starting fresh");
            return GameState::new(cfg);
        }
        for (key, issue) in loaded.malformed() {
            log::warn!("ignoring saved {}: {:?}", key, issue);
        }

        let mapper = CoordMapper::new(cfg.tile_size);
        let mut registry = CellRegistry::new();

        let cell = match loaded.player_cell {
            Some(c) => registry.cell(c.i, c.j),
            None => start_cell(cfg, &mapper, &mut registry),
        };
        let player = Player::restore(
            cell,
            loaded.player_inventory.unwrap_or_default(),
            loaded.movement_history.unwrap_or_default(),
            mapper.to_lat_lng(cell),
        );

        let mut store = CacheStore::new(cfg.coins);
        let caches = loaded.cache_storage.unwrap_or_default();
        for (c, memento) in &caches {
            let c = registry.cell(c.i, c.j);
            if let Err(e) = store.restore(c, memento) {
                log::warn!("skipping saved cache {}: {}", c, e);
            }
        }
        let originals = loaded.cache_originals.unwrap_or_default();
        for (c, memento) in &originals {
            if let Err(e) = store.set_original(*c, memento) {
                log::warn!("skipping original for cache {}: {}", c, e);
            }
        }
        // Caches saved without an original reset to what they hold now.
        let mut adopted = 0usize;
        for (c, memento) in &caches {
            if store.original(*c).is_none() && store.set_original(*c, memento).is_ok() {
                adopted += 1;
            }
        }
        if adopted > 0 {
            log::warn!("{} cache(s) had no recorded original; using saved content", adopted);
        }

        log::info!(
            "restored game: player at {}, {} coin(s) held, {} cache(s)",
            player.cell(),
            player.inventory().len(),
            store.len()
        );
        GameState::assemble(cfg, registry, mapper, store, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_cache::{CacheMemento, Coin};
    use geocoin_grid::{Cell, LatLng};
    use geocoin_io::{KeyValueStore, MemoryStore, read_snapshot, write_snapshot};

    fn cfg() -> WorldGenConfig {
        WorldGenConfig {
            seed: Some(3),
            spawn_probability: 1.0,
            visibility_radius: 1,
            ..WorldGenConfig::default()
        }
    }

    #[test]
    fn empty_storage_is_fresh_game() {
        let gs = GameState::from_saved(&cfg(), read_snapshot(&MemoryStore::new()));
        assert_eq!(gs.player.cell(), GameState::new(&cfg()).player.cell());
        assert!(gs.store.is_empty());
    }

    #[test]
    fn save_then_load_restores_everything() {
        let mut gs = GameState::new(&cfg());
        gs.regenerate();
        let target = gs.player.cell();
        let coin = gs.store.collect(target, 0).unwrap();
        gs.player.add_coin(coin);
        let mut storage = MemoryStore::new();
        write_snapshot(&mut storage, &gs.to_snapshot()).unwrap();

        let back = GameState::from_saved(&cfg(), read_snapshot(&storage));
        assert_eq!(back.player.cell(), target);
        assert_eq!(back.player.inventory(), &[coin]);
        assert_eq!(back.store.len(), 9);
        assert_eq!(back.store.snapshot(target), gs.store.snapshot(target));
        assert_eq!(back.store.original(target), gs.store.original(target));
        assert!(back.store.dirty_cells().is_empty());
    }

    #[test]
    fn corrupt_field_only_resets_that_field() {
        let mut storage = MemoryStore::new();
        let c = Cell::new(10, 10);
        let mut snap = geocoin_io::SaveSnapshot {
            player_cell: c,
            player_inventory: vec![Coin::new(Cell::new(9, 9), 0)],
            movement_history: vec![LatLng::new(0.001, 0.001)],
            ..Default::default()
        };
        snap.cache_storage
            .insert(Cell::new(9, 9), CacheMemento::from_ids(vec!["9:9#1".into()]));
        write_snapshot(&mut storage, &snap).unwrap();
        storage.save("playerInventory", "garbage").unwrap();

        let gs = GameState::from_saved(&cfg(), read_snapshot(&storage));
        assert_eq!(gs.player.cell(), c);
        assert!(gs.player.inventory().is_empty());
        assert_eq!(gs.player.history().len(), 1);
        // No original was saved for 9:9, so its current content is adopted
        assert_eq!(
            gs.store.original(Cell::new(9, 9)),
            Some(CacheMemento::from_ids(vec!["9:9#1".into()]))
        );
    }
}
