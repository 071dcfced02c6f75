//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_listing, format_stat};
use crate::config::ConfigLoader;
use crate::error::FsError;
use crate::filesystem::GitHubFileSystem;
use crate::remote::{ContentApi, GitHubContentApi};
use crate::uri::FsLocator;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Runtime context for CLI execution: the content API every command goes through.
pub struct RunContext {
    api: Arc<dyn ContentApi>,
}

impl RunContext {
    /// Load configuration (with `config_path` layered on top) and build the REST client.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, FsError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        debug!(base_url = %config.api.base_url, "Using GitHub API");
        let api = GitHubContentApi::new(&config.api)?;
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn ContentApi>) -> Self {
        Self { api }
    }

    /// Run `command`, writing its output to `out`.
    pub fn execute(&self, command: &Commands, out: &mut dyn Write) -> anyhow::Result<()> {
        let text = command.locator();
        let locator = FsLocator::parse(text).with_context(|| format!("bad locator {}", text))?;
        let (fs, path) = GitHubFileSystem::open_locator(Arc::clone(&self.api), &locator)
            .with_context(|| format!("cannot open {}", text))?;
        info!(command = command.name(), locator = %locator, "Running command");

        match command {
            Commands::Ls { .. } => {
                let entry = fs
                    .resolve(&path)
                    .with_context(|| format!("cannot list {}", text))?;
                writeln!(out, "{}", format_listing(&entry))?;
            }
            Commands::Cat { .. } => {
                let mut stream = fs
                    .open_read(&path)
                    .with_context(|| format!("cannot read {}", text))?;
                std::io::copy(&mut stream, out)?;
            }
            Commands::Stat { .. } => {
                let entry = fs
                    .resolve(&path)
                    .with_context(|| format!("cannot stat {}", text))?;
                writeln!(out, "{}", format_stat(&entry))?;
            }
            Commands::Id { .. } => {
                let entry = fs
                    .resolve(&path)
                    .with_context(|| format!("cannot resolve {}", text))?;
                writeln!(out, "{}", entry.canonicalize())?;
            }
        }
        Ok(())
    }
}
