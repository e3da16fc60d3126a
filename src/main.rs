use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};
use neon_snake::game::GameConfig;
use neon_snake::modes::HumanMode;
use neon_snake::storage::{DEFAULT_STORE_FILE, HighScoreStore};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Snake in the terminal, with special food and a saved high score")]
struct Cli {
    /// File holding the persisted high score
    #[arg(long, default_value = DEFAULT_STORE_FILE)]
    high_score_file: PathBuf,

    /// Log file (the terminal itself is taken by the game)
    #[arg(long, default_value = "neon_snake.log")]
    log_file: PathBuf,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    init_logging(&cli.log_file, cli.log_level)?;
    info!("Starting neon_snake {}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::default();
    config
        .validate()
        .map_err(|err| anyhow!("Invalid game configuration: {err}"))?;

    let store = HighScoreStore::new(cli.high_score_file);
    let mut human_mode = HumanMode::new(config, store);
    human_mode.run().await?;

    Ok(())
}
