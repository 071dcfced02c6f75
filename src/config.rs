//! Configuration System
//!
//! Layered configuration for the REST client and logging. Sources, lowest
//! precedence first: built-in defaults, the per-user global file, an explicit
//! file, then `GITHUBFS_*` environment variables (`GITHUBFS_API__TOKEN`,
//! `GITHUBFS_LOGGING__LEVEL`, ...).

use crate::error::FsError;
use crate::logging::LoggingConfig;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubFsConfig {
    /// GitHub REST client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// REST client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token; falls back to `GITHUB_TOKEN` when unset
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "githubfs".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!(
                "Base URL must use http or https, got '{}'",
                base_url
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err("User agent cannot be empty".to_string());
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("Timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl GitHubFsConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), FsError> {
        self.api
            .validate()
            .map_err(|e| FsError::Config(format!("api: {}", e)))
    }
}

/// Builds a [`GitHubFsConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, `explicit` (required when given) and
    /// the environment.
    pub fn load(explicit: Option<&Path>) -> Result<GitHubFsConfig, FsError> {
        let builder = Config::builder().add_source(Config::try_from(&GitHubFsConfig::default())?);
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => sources::explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = builder.add_source(
            Environment::with_prefix("GITHUBFS")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut config: GitHubFsConfig = builder.build()?.try_deserialize()?;
        if config.api.token.is_none() {
            config.api.token = token_from_env();
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a single file on top of the defaults, ignoring every other source.
    pub fn load_from_file(path: &Path) -> Result<GitHubFsConfig, FsError> {
        let builder = Config::builder().add_source(Config::try_from(&GitHubFsConfig::default())?);
        let builder = sources::explicit_file::add_to_builder(builder, path)?;
        let config: GitHubFsConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn token_from_env() -> Option<String> {
    std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
}
