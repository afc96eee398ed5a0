//! Layered settings: defaults → optional TOML file → `BARRELWATCH_*`
//! environment variables. Command-line flags are applied on top by the
//! binary.
//!
//! ```toml
//! origin = "https://search.example.org"
//! path = "/stats"
//! reconnect_delay = "2s"
//! log_file = "barrelwatch.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::connection::endpoint::DEFAULT_FEED_PATH;
use crate::data::duration::parse_duration;

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_RECONNECT_DELAY: &str = "2s";
pub const ENV_PREFIX: &str = "BARRELWATCH";

/// Resolved client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Web front end the feed is served from (`http://` or `https://`).
    pub origin: String,
    /// Feed path on the origin.
    pub path: String,
    /// Fixed delay before reconnecting, e.g. "2s".
    pub reconnect_delay: String,
    /// Where to write logs. Logs are discarded when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings, optionally from a config file.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("origin", DEFAULT_ORIGIN)?
            .set_default("path", DEFAULT_FEED_PATH)?
            .set_default("reconnect_delay", DEFAULT_RECONNECT_DELAY)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to load configuration")?;

        let settings: Settings = config.try_deserialize()?;
        settings.reconnect_delay()?;
        Ok(settings)
    }

    /// The reconnect delay as a duration. Zero is rejected.
    pub fn reconnect_delay(&self) -> Result<Duration> {
        let delay = parse_duration(&self.reconnect_delay)
            .with_context(|| format!("invalid reconnect_delay `{}`", self.reconnect_delay))?;
        if delay.is_zero() {
            bail!("reconnect_delay must be greater than zero");
        }
        Ok(delay)
    }
}
