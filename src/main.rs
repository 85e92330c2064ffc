use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, WriteLogger};

use snek::game::SnakeGame;
use snek::term::{self, TermManager};
use snek::{intent, Engine, GameConfig};

#[derive(Parser)]
#[command(name = "snek")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = 20)]
    width: i32,

    /// Board height in cells
    #[arg(long, default_value_t = 10)]
    height: i32,

    /// Milliseconds between two moves at the start of a game
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    #[arg(long, default_value_t = 3)]
    initial_length: usize,

    #[arg(long, default_value_t = 1)]
    score_per_food: u32,

    /// Tick interval multiplier applied after each food (1.0 keeps a fixed pace)
    #[arg(long, default_value_t = 0.98)]
    speed_up: f64,

    /// Fastest allowed tick interval, in milliseconds
    #[arg(long, default_value_t = 40)]
    min_tick_ms: u64,

    #[arg(long, default_value_t = 5)]
    foods_per_level: u32,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "snek.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            tick_interval_ms: self.tick_ms,
            initial_length: self.initial_length,
            score_per_food: self.score_per_food,
            speed_up: self.speed_up,
            min_tick_interval_ms: self.min_tick_ms,
            foods_per_level: self.foods_per_level,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs go to a file
    if cli.log_level != LevelFilter::Off {
        let file = File::create(&cli.log_file)
            .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
        WriteLogger::init(cli.log_level, Config::default(), file)?;
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let engine = Engine::new(cli.game_config(), rng)?;
    info!("starting with {:?}", engine.config());

    let mut term = TermManager::new()?;
    let needed = term::required_size(cli.width, cli.height);
    if !term.fits(needed) {
        let (w, h) = term.get_terminal_size();
        bail!("terminal is {}x{}, a {}x{} board needs at least {}x{}", w, h, cli.width, cli.height, needed.0, needed.1);
    }

    term.setup()?;

    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = intent::spawn_reader(tx, Arc::clone(&stop));

    let mut game = SnakeGame::new(engine, rx);
    let result = game.play(|snap| Ok(term.draw(snap)?));

    stop.store(true, Ordering::Relaxed);
    let read_result = reader.join();
    term.restore()?;

    match read_result {
        Ok(Err(e)) => warn!("input reader failed: {}", e),
        Err(_) => warn!("input reader panicked"),
        Ok(Ok(())) => {}
    }

    let snap = game.engine().snapshot();
    info!("exiting with score {} after {} ticks", snap.score, snap.ticks);
    result
}
