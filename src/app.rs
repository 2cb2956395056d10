// Declare modules
pub mod cli;
pub mod config;
pub mod filter;
pub mod formatter;
pub mod models;
pub mod probe;
pub mod sanitize;
pub mod scanner;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::{load_presets_file, resolve_config};
use self::formatter::PlaylistWriter;
use self::models::{Outcome, RuntimeConfig};
use self::probe::{FfprobeProber, Prober};
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<Outcome> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration (fails before anything touches the disk)
    let presets = load_presets_file()?;
    let config = resolve_config(args, &presets)?;

    // 3. Scan, probe and write
    let prober = FfprobeProber::new(&config.ffprobe);
    generate(&config, &prober)
}

/// Scans the configured directory and writes the playlist when anything matched.
pub fn generate<P: Prober>(config: &RuntimeConfig, prober: &P) -> Result<Outcome> {
    log::info!("Scanning {}", config.base_dir.display());
    let matches = Scanner::new(config, prober).scan()?;

    if matches.is_empty() {
        log::warn!("No music files left after filtering");
        return Ok(Outcome::NoMatches);
    }
    log::info!("Found {} tracks", matches.len());

    let output_path = PlaylistWriter::write(config, &matches)?;
    log::info!("Wrote {}", output_path.display());
    Ok(Outcome::Written(output_path))
}
