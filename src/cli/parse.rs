//! CLI parse: clap types for githubfs. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// githubfs - browse a GitHub repository as a read-only filesystem
#[derive(Parser, Debug)]
#[command(name = "githubfs")]
#[command(about = "Read-only filesystem view over a GitHub repository")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Every command takes a locator: `github:OWNER/NAME[?revision=REV][!/PATH]`.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a directory's children, or describe a single file
    Ls { locator: String },
    /// Write a file's bytes to stdout
    Cat { locator: String },
    /// Show canonical identity, type and size
    Stat { locator: String },
    /// Print the canonical identity only
    Id { locator: String },
}

impl Commands {
    pub fn locator(&self) -> &str {
        match self {
            Commands::Ls { locator }
            | Commands::Cat { locator }
            | Commands::Stat { locator }
            | Commands::Id { locator } => locator,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Commands::Ls { .. } => "ls",
            Commands::Cat { .. } => "cat",
            Commands::Stat { .. } => "stat",
            Commands::Id { .. } => "id",
        }
    }
}
