use geocoin_grid::LatLng;

use super::App;
use crate::app::{Notice, StepOutput};

impl App {
    pub(super) fn handle_location_reported(&mut self, lat: f64, lng: f64, out: &mut StepOutput) {
        let gs = &mut self.gs;
        let cell = match gs.mapper.to_cell(&mut gs.registry, lat, lng) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("ignoring geolocation fix: {}", e);
                out.notices.push(Notice::GeolocationUnavailable(e.to_string()));
                return;
            }
        };
        let moved = cell != gs.player.cell();
        gs.player.relocate(cell, LatLng::new(lat, lng));
        if moved {
            log::info!("player relocated to {}", cell);
            out.notices.push(Notice::Moved { cell });
        }
        self.commit(out);
    }

    pub(super) fn handle_location_failed(&mut self, reason: String, out: &mut StepOutput) {
        log::warn!("geolocation unavailable: {}", reason);
        out.notices.push(Notice::GeolocationUnavailable(reason));
    }
}
