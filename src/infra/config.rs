//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/billing.toml
//!
//! Positional command line paths override whatever the file says.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config/billing.toml";

/// Timestamp layout of the journey file, e.g. `2024-03-14T08:15:00`; fractional
/// seconds are optional
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Station to zone CSV
    #[serde(default = "default_zone_map")]
    pub zone_map: String,
    /// Tap CSV, ordered chronologically per user
    #[serde(default = "default_journey_data")]
    pub journey_data: String,
    /// chrono format string for the timestamp column
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            zone_map: default_zone_map(),
            journey_data: default_journey_data(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_zone_map() -> String {
    "data/zone_map.csv".to_string()
}

fn default_journey_data() -> String {
    "data/journey_data.csv".to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Billing CSV path; parent directories are created
    #[serde(default = "default_output_file")]
    pub file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { file: default_output_file() }
    }
}

fn default_output_file() -> String {
    "output/bills.csv".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    zone_map: String,
    journey_data: String,
    timestamp_format: String,
    output_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zone_map: default_zone_map(),
            journey_data: default_journey_data(),
            timestamp_format: default_timestamp_format(),
            output_file: default_output_file(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from the CLI flag or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            zone_map: toml_config.input.zone_map,
            journey_data: toml_config.input.journey_data,
            timestamp_format: toml_config.input.timestamp_format,
            output_file: toml_config.output.file,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(config_file = %path, error = %format!("{:#}", e), "config_defaults_used");
                Self::default()
            }
        }
    }

    pub fn with_zone_map(mut self, path: impl Into<String>) -> Self {
        self.zone_map = path.into();
        self
    }

    pub fn with_journey_data(mut self, path: impl Into<String>) -> Self {
        self.journey_data = path.into();
        self
    }

    pub fn with_output_file(mut self, path: impl Into<String>) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn zone_map(&self) -> &str {
        &self.zone_map
    }

    pub fn journey_data(&self) -> &str {
        &self.journey_data
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}
