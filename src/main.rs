//! Pseudoloc - live pseudo-localization for HTML documents.

mod cli;

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use pseudoloc::config::{DEFAULT_CONFIG_FILE, FileConfig};
use pseudoloc::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.transform().verbose);

    let mut config = load_config(&cli.config)?;
    config.apply(&cli.transform().overrides());

    match &cli.command {
        Commands::Localize { args } => cli::localize::run_localize(args, &config),
        Commands::Scan { args } => cli::scan::run_scan(args, &config),
        Commands::Watch { args } => cli::watch::run_watch(args, &config),
    }
}

/// Load the config file. A missing file is fine for the default path
/// (defaults apply); a path the user asked for has to exist.
fn load_config(path: &Path) -> Result<FileConfig> {
    if path.exists() {
        return FileConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()));
    }
    if path == Path::new(DEFAULT_CONFIG_FILE) {
        return Ok(FileConfig::default());
    }
    bail!("config file not found: {}", path.display());
}
