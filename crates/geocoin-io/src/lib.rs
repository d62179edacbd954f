//! Save/load of game state to string key/value storage.
#![forbid(unsafe_code)]

pub mod snapshot;
pub mod storage;

pub use snapshot::{
    FieldIssue, LoadedSnapshot, PersistError, SaveSnapshot, read_snapshot, write_snapshot,
};
pub use storage::{DirStore, KeyValueStore, MemoryStore, StorageError};
