//! githubfs CLI Binary
//!
//! Command-line interface for browsing GitHub repositories as read-only filesystems.

use clap::Parser;
use githubfs::cli::{map_error, Cli, RunContext};
use githubfs::config::ConfigLoader;
use githubfs::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("error: failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("githubfs starting");

    let context = match RunContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("Error loading configuration: {}", e);
            eprintln!("error: {}", map_error(&e.into()));
            process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = context.execute(&cli.command, &mut out) {
        warn!("Command failed: {:#}", e);
        eprintln!("error: {}", map_error(&e));
        process::exit(1);
    }
}

/// Build logging configuration from CLI args and the config files.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::load(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }

    config
}
