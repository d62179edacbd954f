use super::App;
use crate::app::{Notice, StepOutput, UserActionInvalid};
use crate::player::Direction;

impl App {
    /// One grid step. Cell update, history append, regeneration and save all
    /// happen here before the next event is looked at.
    pub(super) fn handle_move_requested(&mut self, dir: Direction, out: &mut StepOutput) {
        let gs = &mut self.gs;
        let from = gs.player.cell();
        let Some(cell) = gs.player.step(dir, &mut gs.registry, &gs.mapper) else {
            let err = UserActionInvalid::OffGrid { from, dir };
            log::info!("rejected: {}", err);
            out.notices.push(Notice::Invalid(err));
            return;
        };
        log::debug!("player stepped {} to {}", dir, cell);
        out.notices.push(Notice::Moved { cell });
        self.commit(out);
    }
}
