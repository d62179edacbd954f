use std::collections::{BTreeMap, VecDeque};

use geocoin_grid::Cell;

use crate::player::Direction;

pub enum Event {
    // Player input
    MoveRequested { dir: Direction },
    CollectRequested { cell: Cell, index: usize },
    // `None` deposits the most recently collected coin
    DepositRequested { cell: Cell, coin: Option<String> },
    ResetRequested,
    RefreshRequested,

    // Geolocation provider
    LocationReported { lat: f64, lng: f64 },
    LocationFailed { reason: String },
}

pub struct EventEnvelope {
    pub id: u64,
    pub kind: Event,
}

/// Tick-bucketed FIFO. Handlers run one at a time to completion, so every
/// mutation is observed whole by the next event.
pub struct EventQueue {
    // map of tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        let id = self.alloc_id();
        self.by_tick
            .entry(self.now)
            .or_default()
            .push_back(EventEnvelope { id, kind });
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now)?.pop_front()
    }

    pub fn advance_tick(&mut self) {
        if self.by_tick.get(&self.now).is_some_and(VecDeque::is_empty) {
            self.by_tick.remove(&self.now);
        }
        self.now += 1;
    }

    pub fn pending(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }
}
