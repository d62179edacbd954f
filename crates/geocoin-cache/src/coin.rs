use std::fmt;
use std::str::FromStr;

use geocoin_grid::Cell;
use serde::{Deserialize, Serialize};

/// A collectible token. Identified by the cell it was minted in and a serial
/// within that cell; the identity never changes as the coin moves between
/// caches and inventories.
///
/// Serializes as its id string, `"{i}:{j}#{serial}"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coin {
    pub origin: Cell,
    pub serial: u32,
}

impl Coin {
    #[inline]
    pub const fn new(origin: Cell, serial: u32) -> Self {
        Self { origin, serial }
    }

    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.origin.i, self.origin.j, self.serial)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinParseError(pub String);

impl fmt::Display for CoinParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed coin id {:?}", self.0)
    }
}

impl std::error::Error for CoinParseError {}

impl FromStr for Coin {
    type Err = CoinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CoinParseError(s.to_string());
        let (cell, serial) = s.split_once('#').ok_or_else(bad)?;
        let origin = Cell::parse_key(cell).ok_or_else(bad)?;
        let serial = serial.parse().map_err(|_| bad())?;
        Ok(Coin { origin, serial })
    }
}

impl TryFrom<String> for Coin {
    type Error = CoinParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coin> for String {
    fn from(value: Coin) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_format() {
        let c = Coin::new(Cell::new(369894, -1220628), 3);
        assert_eq!(c.id(), "369894:-1220628#3");
        assert_eq!("369894:-1220628#3".parse::<Coin>(), Ok(c));
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "1:2", "1:2#", "1#2", "1:2#-1", "x:2#0", "1:2#3#4"] {
            assert!(s.parse::<Coin>().is_err(), "{:?} parsed", s);
        }
    }
}
