use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use geocoin_cache::{CacheMemento, Coin};
use geocoin_grid::{Cell, LatLng};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{KeyValueStore, StorageError};

pub const KEY_PLAYER_CELL: &str = "playerCell";
pub const KEY_PLAYER_INVENTORY: &str = "playerInventory";
pub const KEY_MOVEMENT_HISTORY: &str = "movementHistory";
pub const KEY_CACHE_STORAGE: &str = "cacheStorage";
pub const KEY_CACHE_ORIGINALS: &str = "cacheOriginals";

/// Everything the game persists, in plain data form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveSnapshot {
    pub player_cell: Cell,
    pub player_inventory: Vec<Coin>,
    pub movement_history: Vec<LatLng>,
    pub cache_storage: BTreeMap<Cell, CacheMemento>,
    pub cache_originals: BTreeMap<Cell, CacheMemento>,
}

#[derive(Debug)]
pub enum PersistError {
    Storage(StorageError),
    Encode { key: &'static str, source: serde_json::Error },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Storage(e) => write!(f, "{}", e),
            PersistError::Encode { key, source } => write!(f, "encoding {}: {}", key, source),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PersistError::Storage(e) => Some(e),
            PersistError::Encode { source, .. } => Some(source),
        }
    }
}

impl From<StorageError> for PersistError {
    fn from(value: StorageError) -> Self {
        PersistError::Storage(value)
    }
}

fn encode<T: Serialize>(key: &'static str, value: &T) -> Result<String, PersistError> {
    serde_json::to_string(value).map_err(|source| PersistError::Encode { key, source })
}

/// `{"i:j": "[\"coin\", ...]"}`: each cache is stored as its own memento string.
fn encode_caches(
    key: &'static str,
    caches: &BTreeMap<Cell, CacheMemento>,
) -> Result<String, PersistError> {
    let mut out = BTreeMap::new();
    for (cell, memento) in caches {
        out.insert(cell.key(), encode(key, memento)?);
    }
    encode(key, &out)
}

pub fn write_snapshot(
    store: &mut dyn KeyValueStore,
    snap: &SaveSnapshot,
) -> Result<(), PersistError> {
    store.save(KEY_PLAYER_CELL, &encode(KEY_PLAYER_CELL, &snap.player_cell)?)?;
    store.save(
        KEY_PLAYER_INVENTORY,
        &encode(KEY_PLAYER_INVENTORY, &snap.player_inventory)?,
    )?;
    store.save(
        KEY_MOVEMENT_HISTORY,
        &encode(KEY_MOVEMENT_HISTORY, &snap.movement_history)?,
    )?;
    store.save(
        KEY_CACHE_STORAGE,
        &encode_caches(KEY_CACHE_STORAGE, &snap.cache_storage)?,
    )?;
    store.save(
        KEY_CACHE_ORIGINALS,
        &encode_caches(KEY_CACHE_ORIGINALS, &snap.cache_originals)?,
    )?;
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldIssue {
    Missing,
    Malformed(String),
    Unreadable(String),
}

/// Result of reading a save. A field is `None` when it was missing or could
/// not be used; `issues` says which and why.
#[derive(Clone, Debug, Default)]
pub struct LoadedSnapshot {
    pub player_cell: Option<Cell>,
    pub player_inventory: Option<Vec<Coin>>,
    pub movement_history: Option<Vec<LatLng>>,
    pub cache_storage: Option<BTreeMap<Cell, CacheMemento>>,
    pub cache_originals: Option<BTreeMap<Cell, CacheMemento>>,
    pub issues: Vec<(&'static str, FieldIssue)>,
}

impl LoadedSnapshot {
    /// Nothing at all was found: a first run.
    pub fn is_first_run(&self) -> bool {
        self.issues.len() == 5 && self.issues.iter().all(|(_, i)| *i == FieldIssue::Missing)
    }

    pub fn malformed(&self) -> impl Iterator<Item = &(&'static str, FieldIssue)> {
        self.issues
            .iter()
            .filter(|(_, i)| !matches!(i, FieldIssue::Missing))
    }
}

fn read_raw(
    store: &dyn KeyValueStore,
    key: &'static str,
    issues: &mut Vec<(&'static str, FieldIssue)>,
) -> Option<String> {
    match store.load(key) {
        Ok(Some(s)) => Some(s),
        Ok(None) => {
            issues.push((key, FieldIssue::Missing));
            None
        }
        Err(e) => {
            log::warn!("could not read {}: {}", key, e);
            issues.push((key, FieldIssue::Unreadable(e.to_string())));
            None
        }
    }
}

fn read_field<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
    issues: &mut Vec<(&'static str, FieldIssue)>,
) -> Option<T> {
    let raw = read_raw(store, key, issues)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("saved {} is malformed ({}); using default", key, e);
            issues.push((key, FieldIssue::Malformed(e.to_string())));
            None
        }
    }
}

/// Bad entries inside an otherwise readable map are dropped one by one.
fn read_caches(
    store: &dyn KeyValueStore,
    key: &'static str,
    issues: &mut Vec<(&'static str, FieldIssue)>,
) -> Option<BTreeMap<Cell, CacheMemento>> {
    let raw: BTreeMap<String, String> = read_field(store, key, issues)?;
    let mut out = BTreeMap::new();
    for (cell_key, memento) in raw {
        let Some(cell) = Cell::parse_key(&cell_key) else {
            log::warn!("{}: dropping entry with bad cell key {:?}", key, cell_key);
            issues.push((key, FieldIssue::Malformed(format!("cell key {:?}", cell_key))));
            continue;
        };
        let parsed = serde_json::from_str::<CacheMemento>(&memento)
            .map_err(|e| e.to_string())
            .and_then(|m| m.to_cache().map(|_| m).map_err(|e| e.to_string()));
        match parsed {
            Ok(m) => {
                out.insert(cell, m);
            }
            Err(e) => {
                log::warn!("{}: dropping cache {} ({})", key, cell_key, e);
                issues.push((key, FieldIssue::Malformed(format!("{}: {}", cell_key, e))));
            }
        }
    }
    Some(out)
}

pub fn read_snapshot(store: &dyn KeyValueStore) -> LoadedSnapshot {
    let mut issues = Vec::new();
    let player_cell = read_field(store, KEY_PLAYER_CELL, &mut issues);
    let player_inventory = read_field(store, KEY_PLAYER_INVENTORY, &mut issues);
    let movement_history = read_field(store, KEY_MOVEMENT_HISTORY, &mut issues);
    let cache_storage = read_caches(store, KEY_CACHE_STORAGE, &mut issues);
    let cache_originals = read_caches(store, KEY_CACHE_ORIGINALS, &mut issues);
    LoadedSnapshot {
        player_cell,
        player_inventory,
        movement_history,
        cache_storage,
        cache_originals,
        issues,
    }
}
