#![forbid(unsafe_code)]

mod app;
mod command;
mod event;
mod gamestate;
mod player;
mod render;

use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use geocoin_io::{DirStore, KeyValueStore, MemoryStore, read_snapshot};
use geocoin_world::{MAX_VISIBILITY_RADIUS, WorldGenConfig, load_config_or_default};

use app::App;
use command::Command;
use event::Event;
use gamestate::GameState;
use render::TextRenderer;

#[derive(Parser, Debug)]
#[command(name = "geocoin", about = "Collect coins from caches scattered over a map grid")]
struct Args {
    /// World generation config (TOML). Missing file means defaults.
    #[arg(long, value_name = "FILE", default_value = "geocoin.toml")]
    config: PathBuf,

    /// Directory holding the save files.
    #[arg(long, value_name = "DIR", default_value = "geocoin-save")]
    save_dir: PathBuf,

    /// Keep the game in memory only; nothing is read or written on disk.
    #[arg(long, conflicts_with = "fresh")]
    memory: bool,

    /// Seed for cache sizes (overrides config).
    #[arg(long)]
    seed: Option<u64>,

    /// Visibility radius in cells (overrides config).
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=i64::from(MAX_VISIBILITY_RADIUS)))]
    radius: Option<i32>,

    /// Ignore any saved game and start over.
    #[arg(long)]
    fresh: bool,

    /// Initial geolocation fix as LAT,LNG.
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    at: Option<GeoFix>,
}

#[derive(Clone, Copy, Debug)]
struct GeoFix {
    lat: f64,
    lng: f64,
}

impl FromStr for GeoFix {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = value
            .split_once(',')
            .ok_or_else(|| "expected LAT,LNG".to_string())?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid latitude: {e}"))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid longitude: {e}"))?;
        Ok(Self { lat, lng })
    }
}

fn open_storage(args: &Args) -> Result<Box<dyn KeyValueStore>, Box<dyn Error>> {
    if args.memory {
        log::info!("running without persistence");
        return Ok(Box::new(MemoryStore::new()));
    }
    let store = DirStore::open(&args.save_dir)?;
    log::info!("saving to {}", store.root().display());
    Ok(Box::new(store))
}

fn to_event(cmd: Command) -> Option<Event> {
    Some(match cmd {
        Command::Move(dir) => Event::MoveRequested { dir },
        Command::Goto { lat, lng } => Event::LocationReported { lat, lng },
        Command::NoGps => Event::LocationFailed {
            reason: "no position fix".to_string(),
        },
        Command::Collect { cell, index } => Event::CollectRequested { cell, index },
        Command::Deposit { cell, coin } => Event::DepositRequested { cell, coin },
        Command::Reset => Event::ResetRequested,
        Command::Look => Event::RefreshRequested,
        Command::Inventory | Command::Help | Command::Quit => return None,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg: WorldGenConfig = load_config_or_default(&args.config);
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(r) = args.radius {
        cfg.visibility_radius = r;
    }
    let cfg = cfg.sanitized();

    let storage = open_storage(&args)?;
    let gs = if args.fresh {
        log::info!("--fresh: ignoring any saved game");
        GameState::new(&cfg)
    } else {
        GameState::from_saved(&cfg, read_snapshot(storage.as_ref()))
    };
    let mut app = App::new(gs, storage);
    if let Some(fix) = args.at {
        app.on_geolocation(Ok((fix.lat, fix.lng)));
    }

    let stdout = io::stdout();
    let mut ui = TextRenderer::new(stdout.lock());
    ui.line(command::HELP)?;

    let first = app.step();
    ui.draw_notices(&first.notices)?;
    ui.draw_map(&app.gs.visible, app.gs.player.cell())?;
    ui.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let cmd = match command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                ui.line(&e.to_string())?;
                ui.flush()?;
                continue;
            }
        };
        match &cmd {
            Command::Quit => break,
            Command::Help => ui.line(command::HELP)?,
            Command::Inventory => ui.draw_inventory(app.gs.player.inventory())?,
            _ => {}
        }
        let look = matches!(cmd, Command::Look);
        if let Some(ev) = to_event(cmd) {
            app.submit(ev);
            let out = app.step();
            ui.draw_notices(&out.notices)?;
            if let Some(visible) = &out.visible {
                ui.draw_map(visible, app.gs.player.cell())?;
            }
        }
        if look {
            let gs = &app.gs;
            ui.draw_status(gs.registry.stats(), gs.store.stats(), gs.oracle.probability())?;
        }
        ui.flush()?;
    }

    log::info!(
        "bye: {} coin(s) carried, {} cache(s) known",
        app.gs.player.inventory().len(),
        app.gs.store.len()
    );
    Ok(())
}
