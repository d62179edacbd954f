use std::collections::BTreeMap;

use geocoin_cache::CacheStore;
use geocoin_grid::{Cell, CellRegistry, CoordMapper};
use geocoin_io::SaveSnapshot;
use geocoin_runtime::{VisibilityWindow, VisibleSet};
use geocoin_world::{SpawnOracle, WorldGenConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::player::Player;

/// Everything one session mutates. Owned by the app and handed to handlers
/// by `&mut`; there is no other copy of the player's cell.
pub struct GameState {
    pub tick: u64,

    pub registry: CellRegistry,
    pub mapper: CoordMapper,
    pub oracle: SpawnOracle,
    pub store: CacheStore,
    pub window: VisibilityWindow,

    pub player: Player,
    pub rng: StdRng,

    // Last regeneration result
    pub visible: VisibleSet,
}

pub(crate) fn start_cell(
    cfg: &WorldGenConfig,
    mapper: &CoordMapper,
    registry: &mut CellRegistry,
) -> Cell {
    let start = cfg.start.lat_lng();
    match mapper.to_cell(registry, start.lat, start.lng) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("start location unusable ({}); starting at 0:0", e);
            registry.cell(0, 0)
        }
    }
}

impl GameState {
    /// Fresh world with the player at `cfg.start`.
    pub fn new(cfg: &WorldGenConfig) -> Self {
        let mapper = CoordMapper::new(cfg.tile_size);
        let mut registry = CellRegistry::new();
        let cell = start_cell(cfg, &mapper, &mut registry);
        let player = Player::new(cell, mapper.to_lat_lng(cell));
        Self::assemble(cfg, registry, mapper, CacheStore::new(cfg.coins), player)
    }

    pub(crate) fn assemble(
        cfg: &WorldGenConfig,
        registry: CellRegistry,
        mapper: CoordMapper,
        store: CacheStore,
        player: Player,
    ) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let window = VisibilityWindow::new(cfg.visibility_radius);
        let visible = VisibleSet {
            center: player.cell(),
            radius: window.radius(),
            caches: Vec::new(),
        };
        Self {
            tick: 0,
            registry,
            mapper,
            oracle: SpawnOracle::new(cfg.spawn_probability),
            store,
            window,
            player,
            rng,
            visible,
        }
    }

    /// Rebuilds the visibility window around the player's current cell.
    pub fn regenerate(&mut self) -> &VisibleSet {
        self.visible = self.window.regenerate(
            self.player.cell(),
            &mut self.registry,
            &mut self.store,
            &self.oracle,
            &mut self.rng,
        );
        &self.visible
    }

    pub fn to_snapshot(&self) -> SaveSnapshot {
        let cache_storage: BTreeMap<_, _> = self
            .store
            .iter()
            .map(|(cell, cache)| (cell, cache.snapshot()))
            .collect();
        let cache_originals: BTreeMap<_, _> = self.store.originals().into_iter().collect();
        SaveSnapshot {
            player_cell: self.player.cell(),
            player_inventory: self.player.inventory().to_vec(),
            movement_history: self.player.history().to_vec(),
            cache_storage,
            cache_originals,
        }
    }
}
