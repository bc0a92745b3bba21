//! # snnkit CLI
//!
//! Command-line front end for spike-sequence conversion, record tables and
//! figure rendering.

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use snnkit_cli::config::SnnkitConfig;
use snnkit_cli::SnnkitCli;

fn main() {
    let cli = SnnkitCli::parse();
    // `config init` falls back to defaults so it can replace a broken file
    let (config, load_error) = match cli.load_config() {
        Ok(config) => (config, None),
        Err(err) if cli.initializes_config() => (SnnkitConfig::default(), Some(err)),
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins, then --verbose, then the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cli.verbose {
            "debug"
        } else {
            config.log_level.as_deref().unwrap_or("info")
        };
        EnvFilter::new(level)
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Some(err) = load_error {
        warn!("Ignoring unreadable configuration: {}", err);
    }

    if let Err(err) = cli.execute(&config) {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }
}
