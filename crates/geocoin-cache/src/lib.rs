//! Cache content: coins, per-cell caches, and their snapshots.
#![forbid(unsafe_code)]

mod coin;
mod memento;
mod store;

pub use coin::{Coin, CoinParseError};
pub use memento::{CacheMemento, MementoError};
pub use store::{Cache, CacheError, CacheStore, CacheStoreStats, DepositRejected};
