mod app;
mod config;
mod session;

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::LevelFilter;
use minicraft_blocks::BlockRegistry;
use minicraft_player::InputState;
use minicraft_world::WorldGenMode;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};

use config::GameConfig;
use session::Session;

const DEFAULT_CONFIG: &str = "minicraft.toml";

#[derive(Parser, Debug)]
#[command(name = "minicraft", version, about = "First-person voxel sandbox")]
struct Cli {
    /// Game config (defaults to ./minicraft.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Block definitions replacing the built-in set
    #[arg(long)]
    blocks: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    /// Generate a flat world
    #[arg(long)]
    flat: bool,
    /// off, error, warn, info, debug or trace (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<LevelFilter>,
    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Simulate this many idle frames without a window, then exit
    #[arg(long)]
    headless_frames: Option<u32>,
}

fn init_logging(level: Option<LevelFilter>, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            let level = level.unwrap_or(LevelFilter::Info);
            CombinedLogger::init(vec![
                TermLogger::new(
                    level,
                    simplelog::Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(level, simplelog::Config::default(), File::create(path)?),
            ])?;
        }
        None => {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(LevelFilter::Info).parse_env("RUST_LOG");
            if let Some(level) = level {
                builder.filter_level(level);
            }
            builder.try_init()?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig, Box<dyn Error>> {
    let mut cfg = match &cli.config {
        Some(path) => GameConfig::load_from_path(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => GameConfig::load_from_path(DEFAULT_CONFIG)?,
        None => {
            log::info!("no {DEFAULT_CONFIG} found, using defaults");
            GameConfig::default()
        }
    };
    if let Some(seed) = cli.seed {
        cfg.world.seed = seed;
    }
    if cli.flat {
        cfg.world.mode = WorldGenMode::Flat;
    }
    Ok(cfg)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(&cli)?;
    let registry = match &cli.blocks {
        Some(path) => BlockRegistry::load_from_path(path)?,
        None => BlockRegistry::builtin()?,
    };
    log::info!("{} block types registered", registry.count());
    let mut session = Session::new(&cfg, Arc::new(registry))?;

    match cli.headless_frames {
        Some(frames) => {
            let dt = 1.0 / cfg.window.target_fps.max(1) as f32;
            let mut last = None;
            for _ in 0..frames {
                last = Some(session.step(dt, InputState::default()));
            }
            let p = session.player().position();
            let stats = session.world().stats();
            log::info!(
                "headless run: {} frames, feet at ({:.2}, {:.2}, {:.2}), {}, {} chunks allocated",
                session.frames(),
                p.x,
                p.y,
                p.z,
                last.map_or("not simulated", |o| o.state.label()),
                stats.allocated_chunks
            );
            Ok(())
        }
        None => app::run(session, &cfg.window),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
