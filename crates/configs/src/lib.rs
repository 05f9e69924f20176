//! forum/crates/configs/src/lib.rs
//!
//! Layered runtime configuration. Later layers win:
//!
//! 1. built-in defaults
//! 2. a config file (`config/forum.{toml,json,yaml}` when present, or the
//!    path named by `FORUM_CONFIG`, which must then exist)
//! 3. environment variables such as `FORUM__STORE__TIMEOUT_MS=250`,
//!    including those loaded from a `.env` file

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "config/forum";
const CONFIG_PATH_VAR: &str = "FORUM_CONFIG";
const ENV_PREFIX: &str = "FORUM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Upper bound for any single store call.
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AggregationConfig {
    /// Unset means every reply fetch of a thread is issued at once.
    #[serde(default)]
    pub reply_fetch_concurrency: Option<usize>,
}

impl AggregationConfig {
    pub fn reply_fetch_concurrency(&self) -> Option<NonZeroUsize> {
        self.reply_fetch_concurrency.and_then(NonZeroUsize::new)
    }
}

impl AppConfig {
    /// Loads `.env`, then the layered configuration from the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing `.env` is normal outside development.
        dotenvy::dotenv().ok();
        let file = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        Self::load_with(file.as_deref(), None)
    }

    /// Builds the configuration from an explicit file and environment.
    ///
    /// `file = None` falls back to the optional default file. `env = None`
    /// reads the process environment.
    pub fn load_with(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("store.timeout_ms", 5_000_i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "store.timeout_ms must be greater than zero".into(),
            ));
        }
        if self.aggregation.reply_fetch_concurrency == Some(0) {
            return Err(ConfigError::Invalid(
                "aggregation.reply_fetch_concurrency must be unset or greater than zero".into(),
            ));
        }
        Ok(())
    }
}
