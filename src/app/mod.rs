mod events;
mod init;

use std::fmt;

use geocoin_cache::{CacheError, Coin};
use geocoin_grid::Cell;
use geocoin_io::{KeyValueStore, write_snapshot};
use geocoin_runtime::VisibleSet;

use crate::event::{Event, EventQueue};
use crate::gamestate::GameState;
use crate::player::Direction;

/// A player request that could not be carried out. State is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserActionInvalid {
    NoCache(Cell),
    NoSuchCoin { cell: Cell, index: usize, len: usize },
    NothingSelected,
    UnknownCoin(String),
    OutOfReach(Cell),
    OffGrid { from: Cell, dir: Direction },
}

impl fmt::Display for UserActionInvalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserActionInvalid::NoCache(cell) => write!(f, "there is no cache at {}", cell),
            UserActionInvalid::NoSuchCoin { cell, index, len } => write!(
                f,
                "no such coin: cache {} has {} coin(s), asked for #{}",
                cell, len, index
            ),
            UserActionInvalid::NothingSelected => write!(f, "no coin to deposit"),
            UserActionInvalid::UnknownCoin(id) => write!(f, "you are not carrying {}", id),
            UserActionInvalid::OutOfReach(cell) => write!(f, "cache {} is out of reach", cell),
            UserActionInvalid::OffGrid { from, dir } => {
                write!(f, "the map ends {} of {}", dir, from)
            }
        }
    }
}

impl std::error::Error for UserActionInvalid {}

impl From<CacheError> for UserActionInvalid {
    fn from(value: CacheError) -> Self {
        match value {
            CacheError::NoCache(cell) => UserActionInvalid::NoCache(cell),
            CacheError::NoSuchCoin { cell, index, len } => {
                UserActionInvalid::NoSuchCoin { cell, index, len }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Moved { cell: Cell },
    Collected { coin: Coin, from: Cell },
    Deposited { coin: Coin, into: Cell },
    Reset { caches: usize },
    Invalid(UserActionInvalid),
    GeolocationUnavailable(String),
    SaveFailed(String),
}

/// What one step produced, for the renderer to draw.
#[derive(Debug, Default)]
pub struct StepOutput {
    // Latest window if any handler regenerated it
    pub visible: Option<VisibleSet>,
    pub notices: Vec<Notice>,
}

pub struct App {
    pub gs: GameState,
    pub queue: EventQueue,
    storage: Box<dyn KeyValueStore>,
}

impl App {
    pub fn new(gs: GameState, storage: Box<dyn KeyValueStore>) -> Self {
        let mut queue = EventQueue::new();
        // Bootstrap the first window
        queue.emit_now(Event::RefreshRequested);
        Self { gs, queue, storage }
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn submit(&mut self, ev: Event) -> u64 {
        self.queue.emit_now(ev)
    }

    /// Feeds one geolocation fix (or failure) into the queue.
    pub fn on_geolocation(&mut self, fix: Result<(f64, f64), String>) -> u64 {
        match fix {
            Ok((lat, lng)) => self.submit(Event::LocationReported { lat, lng }),
            Err(reason) => self.submit(Event::LocationFailed { reason }),
        }
    }

    /// Runs every event queued for the current tick, in order, then advances.
    pub fn step(&mut self) -> StepOutput {
        let mut out = StepOutput::default();
        while let Some(env) = self.queue.pop_ready() {
            log::trace!(target: "events", "dispatch #{}", env.id);
            self.handle_event(env, &mut out);
        }
        debug_assert_eq!(self.queue.pending(), 0);
        self.queue.advance_tick();
        self.gs.tick += 1;
        out
    }

    fn refresh(&mut self, out: &mut StepOutput) {
        let visible = self.gs.regenerate().clone();
        out.visible = Some(visible);
    }

    fn save(&mut self, out: &mut StepOutput) {
        let dirty = self.gs.store.stats().dirty;
        match write_snapshot(self.storage.as_mut(), &self.gs.to_snapshot()) {
            Ok(()) => {
                self.gs.store.mark_saved();
                log::debug!("saved game ({} cache(s) changed)", dirty);
            }
            Err(e) => {
                log::warn!("save failed: {}", e);
                out.notices.push(Notice::SaveFailed(e.to_string()));
            }
        }
    }

    /// Refresh for its own sake. Caches it spawned are saved right away so a
    /// restart finds the same ones.
    fn look(&mut self, out: &mut StepOutput) {
        self.refresh(out);
        if self.gs.store.stats().dirty > 0 {
            self.save(out);
        }
    }

    /// Regenerate the window, then persist. Every state change ends here.
    fn commit(&mut self, out: &mut StepOutput) {
        self.refresh(out);
        self.save(out);
    }
}
