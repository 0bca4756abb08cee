//! Command-line entry point for the gesture tree.
//!
//! Usage: `gesture-tree [--config tree.json] [--recording hands.json]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gesture_tree::{Visualization, VisualizationConfig};

#[derive(Parser)]
#[command(name = "gesture-tree")]
#[command(about = "Particle Christmas tree that explodes on an open palm", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a hand landmark recording instead of a live camera
    #[arg(short, long)]
    recording: Option<PathBuf>,

    /// Override the particle count
    #[arg(short, long)]
    particles: Option<u32>,

    /// Fixed seed for a reproducible particle layout
    #[arg(long)]
    seed: Option<u64>,

    /// Skip hand tracking; drive the tree with T and E only
    #[arg(long)]
    manual: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins when set
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = match &cli.config {
        Some(path) => VisualizationConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => VisualizationConfig::default(),
    };

    if let Some(count) = cli.particles {
        config.particle_count = count;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.recording.is_some() {
        config.capture.recording = cli.recording;
    }
    config.capture.manual_only |= cli.manual;

    log::info!(
        "Starting with {} particles ({})",
        config.particle_count,
        match (&config.capture.recording, config.capture.manual_only) {
            (_, true) => "manual control".to_string(),
            (Some(path), false) => format!("replaying {}", path.display()),
            (None, false) => "camera".to_string(),
        }
    );

    Visualization::new(config).run()?;
    Ok(())
}
