//! Configuration loading
//!
//! Layers, lowest to highest priority:
//! 1. Built-in defaults
//! 2. TOML file (`numen.toml` in the working directory, `NUMEN_CONFIG_PATH`,
//!    or an explicit path)
//! 3. `NUMEN_*` environment variables (a `.env` file is loaded first)
//! 4. Programmatic overrides from [`ConfigBuilder`]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::interpreter::executor::DEFAULT_MAX_FRAMES;
use crate::interpreter::types::{DEFAULT_ENTRY, DEFAULT_VERSION};
use crate::interpreter::RunOptions;

const ENV_PREFIX: &str = "NUMEN";
const CONFIG_PATH_ENV: &str = "NUMEN_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "numen";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Function run after the top-level program
    pub entry: String,

    /// Fail when the entry function is not defined
    pub require_entry: bool,

    /// Cap on live executor frames
    pub max_frames: usize,

    /// Value of the `version` binding
    pub version: String,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY.to_string(),
            require_entry: true,
            max_frames: DEFAULT_MAX_FRAMES,
            version: DEFAULT_VERSION.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            bail!("entry must not be empty");
        }
        if self.max_frames == 0 {
            bail!("max_frames must be at least 1");
        }
        Ok(())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions::from(self)
    }
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        RunOptions {
            entry: config.entry.clone(),
            require_entry: config.require_entry,
            max_frames: config.max_frames,
            version: config.version.clone(),
        }
    }
}

/* ===================== Builder ===================== */

#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    entry: Option<String>,
    require_entry: Option<bool>,
    max_frames: Option<usize>,
    version: Option<String>,
    log_level: Option<String>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Explicit config file; takes precedence over `NUMEN_CONFIG_PATH`
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn entry(mut self, entry: Option<String>) -> Self {
        self.entry = entry;
        self
    }

    pub fn require_entry(mut self, require_entry: Option<bool>) -> Self {
        self.require_entry = require_entry;
        self
    }

    pub fn max_frames(mut self, max_frames: Option<usize>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn log_level(mut self, log_level: Option<String>) -> Self {
        self.log_level = log_level;
        self
    }

    /// Ignore `.env`, `NUMEN_*` variables and `NUMEN_CONFIG_PATH`
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    pub fn build(self) -> Result<Config> {
        let defaults = Config::default();
        let mut builder = config::Config::builder()
            .set_default("entry", defaults.entry)?
            .set_default("require_entry", defaults.require_entry)?
            .set_default("max_frames", defaults.max_frames as i64)?
            .set_default("version", defaults.version)?
            .set_default("log_level", defaults.log_level)?;

        if !self.skip_env {
            let _ = dotenvy::dotenv();
        }

        let path = match self.config_path {
            Some(path) => Some(path),
            None if !self.skip_env => std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
            None => None,
        };
        builder = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                builder.add_source(config::File::from(path).required(true))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        if !self.skip_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .ignore_empty(true),
            );
        }

        if let Some(entry) = self.entry {
            builder = builder.set_override("entry", entry)?;
        }
        if let Some(require_entry) = self.require_entry {
            builder = builder.set_override("require_entry", require_entry)?;
        }
        if let Some(max_frames) = self.max_frames {
            builder = builder.set_override("max_frames", max_frames as i64)?;
        }
        if let Some(version) = self.version {
            builder = builder.set_override("version", version)?;
        }
        if let Some(log_level) = self.log_level {
            builder = builder.set_override("log_level", log_level)?;
        }

        let config: Config = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }
}
