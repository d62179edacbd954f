use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cache, Coin};

/// A saved coin list that does not parse back into coins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MementoError(pub String);

impl fmt::Display for MementoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed cache snapshot: {}", self.0)
    }
}

impl std::error::Error for MementoError {}

/// Serializable snapshot of a cache's coin list: the coin ids in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheMemento {
    coins: Vec<String>,
}

impl CacheMemento {
    pub fn from_ids(coins: Vec<String>) -> Self {
        Self { coins }
    }

    pub fn from_coins(coins: &[Coin]) -> Self {
        Self {
            coins: coins.iter().map(Coin::id).collect(),
        }
    }

    /// Parses every id; the first bad one fails the whole memento.
    pub fn to_cache(&self) -> Result<Cache, MementoError> {
        let coins = self
            .coins
            .iter()
            .map(|id| {
                id.parse::<Coin>()
                    .map_err(|e| MementoError(format!("{:?}: {}", id, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Cache::from_coins(coins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_grid::Cell;

    #[test]
    fn bad_id_fails_whole_memento() {
        let m = CacheMemento::from_ids(vec!["1:1#0".into(), "oops".into()]);
        assert!(matches!(m.to_cache(), Err(MementoError(msg)) if msg.contains("oops")));
    }

    #[test]
    fn keeps_order() {
        let a = Coin::new(Cell::new(0, 0), 2);
        let b = Coin::new(Cell::new(9, -9), 0);
        let m = CacheMemento::from_coins(&[a, b]);
        assert_eq!(m, CacheMemento::from_ids(vec!["0:0#2".into(), "9:-9#0".into()]));
        assert_eq!(m.to_cache().unwrap().coins(), &[a, b]);
    }
}
