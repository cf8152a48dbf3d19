//! Town Layout - Entry Point
//!
//! Generates one town and prints a summary, optionally writing the full
//! snapshot as JSON.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use town_layout::core::config::LayoutConfig;
use town_layout::core::error::Result;
use town_layout::town::Town;

/// Generate a town layout
#[derive(Parser, Debug)]
#[command(name = "town-layout")]
#[command(about = "Generate a town's streets, lots and distance table")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with layout settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the land (power of two)
    #[arg(long)]
    land_size: Option<u32>,

    /// Regenerate until at least this many tracts exist
    #[arg(long)]
    min_tracts: Option<usize>,

    /// Write the town snapshot as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "town_layout=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::new(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(land_size) = args.land_size {
        config.land_size = land_size;
    }
    if let Some(min_tracts) = args.min_tracts {
        config.min_tracts = min_tracts;
    }

    let town = Town::generate(&config)?;
    let snapshot = town.snapshot();
    println!("{}", snapshot.summary());

    if let Some(path) = &args.output {
        fs::write(path, snapshot.to_json()?)?;
        tracing::info!(path = %path.display(), "Wrote town snapshot");
    }

    Ok(())
}
