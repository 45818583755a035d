//! Headless demo: runs a level in the sandbox and logs the outcome.
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use squatch::init_logging;
use squatch::sandbox::{Level, LevelConfig};

/// Runs a stealth level without a game engine
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON level description; the built-in clearing is used when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Simulated seconds to run for
    #[arg(short, long, default_value_t = 30.0)]
    seconds: f32,

    /// Fixed simulation step in seconds
    #[arg(long, default_value_t = 0.05)]
    step: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(args.step > 0.0, "--step must be positive, got {}", args.step);

    let config = match &args.level {
        Some(path) => LevelConfig::from_path(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => LevelConfig::builtin(),
    };
    let mut level = Level::new(&config).context("building level")?;
    let report = level.run(args.seconds, args.step);
    info!("{report}");
    Ok(())
}
