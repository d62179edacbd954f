use geocoin_grid::Cell;

use super::App;
use crate::app::{Notice, StepOutput, UserActionInvalid};

impl App {
    fn in_reach(&self, cell: Cell) -> Result<(), UserActionInvalid> {
        if self.gs.window.contains(self.gs.player.cell(), cell) {
            Ok(())
        } else {
            Err(UserActionInvalid::OutOfReach(cell))
        }
    }

    fn reject(&self, err: UserActionInvalid, out: &mut StepOutput) {
        log::info!("rejected: {}", err);
        out.notices.push(Notice::Invalid(err));
    }

    pub(super) fn handle_collect_requested(&mut self, cell: Cell, index: usize, out: &mut StepOutput) {
        if let Err(e) = self.in_reach(cell) {
            return self.reject(e, out);
        }
        let coin = match self.gs.store.collect(cell, index) {
            Ok(c) => c,
            Err(e) => return self.reject(e.into(), out),
        };
        self.gs.player.add_coin(coin);
        log::info!("collected {} from {}", coin, cell);
        out.notices.push(Notice::Collected { coin, from: cell });
        self.commit(out);
    }

    /// `coin` names an inventory coin by id; `None` means the most recently
    /// collected one.
    pub(super) fn handle_deposit_requested(
        &mut self,
        cell: Cell,
        coin: Option<String>,
        out: &mut StepOutput,
    ) {
        if let Err(e) = self.in_reach(cell) {
            return self.reject(e, out);
        }
        let selected = match coin {
            Some(id) => match self.gs.player.find_coin(&id) {
                Some(c) => c,
                None => return self.reject(UserActionInvalid::UnknownCoin(id), out),
            },
            None => match self.gs.player.last_coin() {
                Some(c) => c,
                None => return self.reject(UserActionInvalid::NothingSelected, out),
            },
        };
        let Some((slot, coin)) = self.gs.player.remove_coin(&selected) else {
            return self.reject(UserActionInvalid::UnknownCoin(selected.id()), out);
        };
        if let Err(rejected) = self.gs.store.deposit(cell, coin) {
            // Back into the slot it came from
            self.gs.player.return_coin(slot, rejected.coin);
            return self.reject(UserActionInvalid::NoCache(rejected.cell), out);
        }
        log::info!("deposited {} into {}", coin, cell);
        out.notices.push(Notice::Deposited { coin, into: cell });
        self.commit(out);
    }

    pub(super) fn handle_reset_requested(&mut self, out: &mut StepOutput) {
        self.gs.store.reset_all();
        let dropped = self.gs.player.clear_inventory();
        let caches = self.gs.store.stats().originals;
        log::info!(
            "game reset: {} cache(s) restored, {} coin(s) dropped from inventory",
            caches,
            dropped.len()
        );
        out.notices.push(Notice::Reset { caches });
        self.commit(out);
    }
}
