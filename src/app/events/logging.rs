use super::App;
use crate::event::Event;

impl App {
    pub(super) fn log_event(tick: u64, ev: &Event) {
        use crate::event::Event as E;
        match ev {
            E::MoveRequested { dir } => {
                log::info!(target: "events", "[tick {}] MoveRequested dir={}", tick, dir);
            }
            E::CollectRequested { cell, index } => {
                log::info!(target: "events", "[tick {}] CollectRequested cell={} index={}", tick, cell, index);
            }
            E::DepositRequested { cell, coin } => {
                log::info!(
                    target: "events",
                    "[tick {}] DepositRequested cell={} coin={}",
                    tick,
                    cell,
                    coin.as_deref().unwrap_or("<last>")
                );
            }
            E::ResetRequested => {
                log::info!(target: "events", "[tick {}] ResetRequested", tick);
            }
            E::RefreshRequested => {
                log::debug!(target: "events", "[tick {}] RefreshRequested", tick);
            }
            E::LocationReported { lat, lng } => {
                log::debug!(target: "events", "[tick {}] LocationReported ({:.6}, {:.6})", tick, lat, lng);
            }
            E::LocationFailed { reason } => {
                log::info!(target: "events", "[tick {}] LocationFailed reason={:?}", tick, reason);
            }
        }
    }
}
