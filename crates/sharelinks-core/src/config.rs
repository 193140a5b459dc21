//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/sharelinks/config.toml)
//! 3. Environment variables (SHARELINKS_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::StoreOptions;

/// Environment variable prefix
const ENV_PREFIX: &str = "SHARELINKS";

/// Name of the link file inside the data directory
const LINKS_FILE: &str = "shareable-links.json";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (link file, logs)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Origin prepended to `/share/<id>` in generated URLs
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Lifetime of a new link when the caller does not pass one
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: f64,

    /// Purge expired links when the store is opened
    #[serde(default = "default_true")]
    pub cleanup_on_open: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            origin: default_origin(),
            default_expiry_days: default_expiry_days(),
            cleanup_on_open: true,
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHARELINKS_DATA_DIR, SHARELINKS_ORIGIN, ...)
    /// 2. Config file (~/.config/sharelinks/config.toml or SHARELINKS_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// A non-numeric expiry is an error rather than silently ignored.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_ORIGIN", ENV_PREFIX)) {
            if !val.is_empty() {
                self.origin = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_DEFAULT_EXPIRY_DAYS", ENV_PREFIX)) {
            self.default_expiry_days = val.parse::<f64>().with_context(|| {
                format!("{}_DEFAULT_EXPIRY_DAYS must be a number, got {:?}", ENV_PREFIX, val)
            })?;
        }

        if let Ok(val) = std::env::var(format!("{}_CLEANUP_ON_OPEN", ENV_PREFIX)) {
            self.cleanup_on_open = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_level = val;
            }
        }

        Ok(())
    }

    /// Reject values the store cannot work with
    fn validate(&self) -> Result<()> {
        if !self.default_expiry_days.is_finite() || self.default_expiry_days <= 0.0 {
            anyhow::bail!(
                "default_expiry_days must be a positive number, got {}",
                self.default_expiry_days
            );
        }
        if self.origin.trim().is_empty() {
            anyhow::bail!("origin must not be empty");
        }
        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SHARELINKS_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sharelinks")
            .join("config.toml")
    }

    /// Get the path to the link file
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(LINKS_FILE)
    }

    /// Store settings derived from this configuration
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            origin: self.origin.clone(),
            default_expiry_days: self.default_expiry_days,
            cleanup_on_open: self.cleanup_on_open,
        }
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sharelinks")
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_expiry_days() -> f64 {
    7.0
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}
