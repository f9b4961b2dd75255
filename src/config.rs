// src/config.rs
//! Runtime configuration for the bundled resolver and allocator adapters.
//!
//! Settings are layered: an optional configuration file, then environment
//! variables prefixed with `DID_ROOT_STORE` using `__` as the separator
//! (`DID_ROOT_STORE__IPFS__API_URL=http://ipfs:5001`). A `.env` file in the
//! working directory is loaded first, if present.
//!
//! The address pipeline itself takes no configuration.

use ::config::{Config, Environment, File};
use dotenv::dotenv;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "DID_ROOT_STORE";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub ipfs: IpfsSettings,
    /// `env_logger` filter, e.g. `info` or `did_root_store=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResolverSettings {
    #[serde(default = "default_resolver_url")]
    pub url: String,
    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IpfsSettings {
    #[serde(default = "default_ipfs_api_url")]
    pub api_url: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_resolver_url() -> String {
    "https://uniresolver.io".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ipfs_api_url() -> String {
    "http://localhost:5001".to_string()
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            url: default_resolver_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for IpfsSettings {
    fn default() -> Self {
        Self {
            api_url: default_ipfs_api_url(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver: ResolverSettings::default(),
            ipfs: IpfsSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, an optional file and the environment.
    ///
    /// `path` is passed to [`File::with_name`], so the extension may be
    /// omitted. A missing file is not an error.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        Ok(config.try_deserialize()?)
    }
}

/// Installs `env_logger` with the configured filter. `RUST_LOG` takes
/// precedence when set.
///
/// Returns an error if a logger was already installed.
pub fn init_logging(settings: &Settings) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .try_init()
}

#[derive(thiserror::Error, Debug)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] ::config::ConfigError);
