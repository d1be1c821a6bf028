//! CLI settings
//!
//! Environment-driven settings, with `.env` support. Command-line flags
//! override whatever is read here.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use trust_engine::{TrustConfig, DEFAULT_MAX_EVENTS};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// JSON file holding a `TrustConfig`; the stock tuning is used when unset
    pub config_path: Option<PathBuf>,
    /// Retention cap applied when appending events
    pub max_events: usize,
}

/// Load `.env` into the process environment, if present
///
/// Runs before argument parsing so clap's env fallbacks see the same values.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: None,
            max_events: DEFAULT_MAX_EVENTS,
        }
    }
}

impl Settings {
    /// Read settings from the environment
    ///
    /// Optional env vars:
    /// - TRUST_CONFIG_PATH: path to a JSON scoring configuration
    /// - TRUST_MAX_EVENTS: events retained per contributor (default 150)
    ///
    /// Call `load_dotenv` first so `.env` values are visible.
    pub fn from_env() -> Result<Self> {
        let max_events = match env::var("TRUST_MAX_EVENTS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("TRUST_MAX_EVENTS is not a number: {}", raw))?,
            Err(_) => DEFAULT_MAX_EVENTS,
        };

        Ok(Self {
            config_path: env::var("TRUST_CONFIG_PATH").ok().map(PathBuf::from),
            max_events,
        })
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.config_path = path;
        }
        self
    }

    pub fn with_max_events(mut self, max_events: Option<usize>) -> Self {
        if let Some(max) = max_events {
            self.max_events = max;
        }
        self
    }

    /// Load and validate the scoring configuration
    pub fn load_trust_config(&self) -> Result<TrustConfig> {
        match &self.config_path {
            Some(path) => load_config_file(path),
            None => Ok(TrustConfig::default()),
        }
    }
}

fn load_config_file(path: &Path) -> Result<TrustConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = TrustConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded scoring config");
    Ok(config)
}
