mod app;
mod term;

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use slither::logger::init_logger;
use slither::{log, Game, GameConfig, GameRng};

#[derive(Parser, Debug)]
#[command(name = "slither", about = "Grid snake in the terminal")]
struct Args {
    /// YAML game configuration; defaults are used when the file is missing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells, overrides the config
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells, overrides the config
    #[arg(long)]
    height: Option<u16>,

    /// Seed for food placement, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the default configuration to this file and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).map_err(|e| anyhow!(e))?,
        None => GameConfig::default(),
    };

    if let Some(width) = args.width {
        config.grid_width = width;
    }
    if let Some(height) = args.height {
        config.grid_height = height;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        GameConfig::default().save(path).map_err(|e| anyhow!(e))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let sink: Box<dyn io::Write + Send> = match &args.log_file {
        Some(path) => Box::new(
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?,
        ),
        None => Box::new(io::sink()),
    };
    init_logger(Some("slither".to_string()), sink);

    let config = load_config(&args)?;
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    let game = Game::new(config, rng).map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    log!("Starting with seed {}", game.seed());

    let mut app = app::App::new(game)?;
    app.run()?;

    log!("Exited cleanly");
    Ok(())
}
