mod caches;
mod location;
mod logging;
mod movement;

use super::{App, StepOutput};
use crate::event::{Event, EventEnvelope};

impl App {
    pub(super) fn handle_event(&mut self, env: EventEnvelope, out: &mut StepOutput) {
        // Log a concise line for the processed event
        Self::log_event(self.gs.tick, &env.kind);
        match env.kind {
            Event::MoveRequested { dir } => {
                self.handle_move_requested(dir, out);
            }
            Event::LocationReported { lat, lng } => {
                self.handle_location_reported(lat, lng, out);
            }
            Event::LocationFailed { reason } => {
                self.handle_location_failed(reason, out);
            }
            Event::CollectRequested { cell, index } => {
                self.handle_collect_requested(cell, index, out);
            }
            Event::DepositRequested { cell, coin } => {
                self.handle_deposit_requested(cell, coin, out);
            }
            Event::ResetRequested => {
                self.handle_reset_requested(out);
            }
            Event::RefreshRequested => {
                self.look(out);
            }
        }
    }
}
