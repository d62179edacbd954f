use geocoin_grid::Cell;

/// String hash onto `[0, 1)`.
pub type HashFn = fn(&str) -> f64;

/// Seed-free string hash mapped to `[0, 1)`. FNV-1a over the bytes followed by
/// a 64-bit avalanche so neighbouring keys land far apart; the top 53 bits
/// become the mantissa.
pub fn hash01(input: &str) -> f64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in input.as_bytes() {
        h ^= u64::from(*b);
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// Decides whether a cell holds a cache. The answer depends only on the
/// cell's coordinates, never on visit order or session.
#[derive(Clone, Copy, Debug)]
pub struct SpawnOracle {
    probability: f64,
    hash: HashFn,
}

impl SpawnOracle {
    pub fn new(probability: f64) -> Self {
        Self::with_hash(probability, hash01)
    }

    pub fn with_hash(probability: f64, hash: HashFn) -> Self {
        Self { probability, hash }
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// The raw roll for `cell`, in `[0, 1)`.
    #[inline]
    pub fn luck(&self, cell: Cell) -> f64 {
        (self.hash)(&format!("{},{}", cell.i, cell.j))
    }

    pub fn should_spawn(&self, cell: Cell) -> bool {
        if self.probability >= 1.0 {
            return true;
        }
        if self.probability.is_nan() || self.probability <= 0.0 {
            return false;
        }
        self.luck(cell) < self.probability
    }
}
