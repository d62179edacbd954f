use std::io::{self, Write};

use geocoin_cache::{CacheStoreStats, Coin};
use geocoin_grid::{Cell, CellRegistryStats};
use geocoin_runtime::VisibleSet;

use crate::app::Notice;

/// Draws game state as plain text. Reads only; never touches the session.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// North at the top. `@` marks the player, digits are coin counts
    /// (`*` for ten or more), `o` an emptied cache, `.` no cache. Past the
    /// edge of the grid the row is blank.
    pub fn draw_map(&mut self, visible: &VisibleSet, player: Cell) -> io::Result<()> {
        let r = visible.radius;
        let c = visible.center;
        writeln!(self.out, "map around {} (radius {})", c, r)?;
        for di in (-r..=r).rev() {
            let mut row = String::with_capacity((2 * r + 1) as usize * 2);
            for dj in -r..=r {
                let glyph = match c.offset(di, dj) {
                    None => ' ',
                    Some(cell) if cell == player => '@',
                    Some(cell) => match visible.get(cell).map(|cache| cache.len()) {
                        None => '.',
                        Some(0) => 'o',
                        Some(n @ 1..=9) => char::from(b'0' + n as u8),
                        Some(_) => '*',
                    },
                };
                row.push(glyph);
                row.push(' ');
            }
            writeln!(self.out, "  {}", row.trim_end())?;
        }
        self.draw_markers(visible)
    }

    /// One line per visible cache, listing its coins by index.
    pub fn draw_markers(&mut self, visible: &VisibleSet) -> io::Result<()> {
        if visible.is_empty() {
            return writeln!(self.out, "no caches in sight");
        }
        for (cell, cache) in &visible.caches {
            let coins: Vec<String> = cache
                .coins()
                .iter()
                .enumerate()
                .map(|(idx, coin)| format!("[{}] {}", idx, coin))
                .collect();
            writeln!(self.out, "cache {:>16}: {}", cell.to_string(), coins.join("  "))?;
        }
        Ok(())
    }

    pub fn draw_inventory(&mut self, coins: &[Coin]) -> io::Result<()> {
        if coins.is_empty() {
            return writeln!(self.out, "inventory: empty");
        }
        let ids: Vec<String> = coins.iter().map(Coin::id).collect();
        writeln!(self.out, "inventory ({}): {}", coins.len(), ids.join(", "))
    }

    pub fn draw_notices(&mut self, notices: &[Notice]) -> io::Result<()> {
        for n in notices {
            match n {
                Notice::Moved { cell } => writeln!(self.out, "you are at {}", cell)?,
                Notice::Collected { coin, from } => {
                    writeln!(self.out, "collected {} from {}", coin, from)?
                }
                Notice::Deposited { coin, into } => {
                    writeln!(self.out, "deposited {} into {}", coin, into)?
                }
                Notice::Reset { caches } => {
                    writeln!(self.out, "reset: {} cache(s) restored, inventory emptied", caches)?
                }
                Notice::Invalid(e) => writeln!(self.out, "can't do that: {}", e)?,
                Notice::GeolocationUnavailable(reason) => {
                    writeln!(self.out, "location unavailable: {}", reason)?
                }
                Notice::SaveFailed(reason) => writeln!(self.out, "warning: not saved: {}", reason)?,
            }
        }
        Ok(())
    }

    /// Bookkeeping summary shown with `look`.
    pub fn draw_status(
        &mut self,
        registry: CellRegistryStats,
        store: CacheStoreStats,
        spawn_probability: f64,
    ) -> io::Result<()> {
        let hit_rate = if registry.lookups == 0 {
            0.0
        } else {
            registry.hits as f64 * 100.0 / registry.lookups as f64
        };
        writeln!(
            self.out,
            "status: {} cell(s) known ({:.0}% reused), {} cache(s) holding {} coin(s), \
             {} unsaved, spawn chance {:.1}%",
            registry.interned,
            hit_rate,
            store.caches,
            store.coins,
            store.dirty,
            spawn_probability * 100.0
        )
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_cache::Cache;

    fn render(f: impl FnOnce(&mut TextRenderer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut r = TextRenderer::new(Vec::new());
        f(&mut r).unwrap();
        String::from_utf8(r.out).unwrap()
    }

    #[test]
    fn map_puts_north_on_top() {
        let center = Cell::new(0, 0);
        let north = Cell::new(1, 0);
        let visible = VisibleSet {
            center,
            radius: 1,
            caches: vec![(
                north,
                Cache::from_coins(vec![Coin::new(north, 0), Coin::new(north, 1)]),
            )],
        };
        let text = render(|r| r.draw_map(&visible, center));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[1], "  . 2 .");
        assert_eq!(rows[2], "  . @ .");
        assert_eq!(rows[3], "  . . .");
        assert!(rows[4].contains("[1] 1:0#1"));
    }

    #[test]
    fn map_leaves_off_grid_cells_blank() {
        let center = Cell::new(i32::MAX, 0);
        let visible = VisibleSet {
            center,
            radius: 1,
            caches: Vec::new(),
        };
        let text = render(|r| r.draw_map(&visible, center));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[1], "  ");
        assert_eq!(rows[2], "  . @ .");
        assert_eq!(rows[3], "  . . .");
    }

    #[test]
    fn status_line_summarises_bookkeeping() {
        let registry = CellRegistryStats {
            interned: 25,
            lookups: 50,
            hits: 25,
        };
        let store = CacheStoreStats {
            caches: 3,
            coins: 7,
            originals: 3,
            dirty: 1,
        };
        let text = render(|r| r.draw_status(registry, store, 0.1));
        assert_eq!(
            text,
            "status: 25 cell(s) known (50% reused), 3 cache(s) holding 7 coin(s), \
             1 unsaved, spawn chance 10.0%\n"
        );
    }

    #[test]
    fn empty_inventory_and_notices() {
        let text = render(|r| {
            r.draw_inventory(&[])?;
            r.draw_notices(&[Notice::GeolocationUnavailable("denied".into())])
        });
        assert_eq!(text, "inventory: empty\nlocation unavailable: denied\n");
    }
}
