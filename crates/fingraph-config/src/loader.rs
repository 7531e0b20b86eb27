//! Configuration loading utilities.

use crate::schema::Config;
use fingraph_common::{FinGraphError, Result as FinGraphResult};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "FINGRAPH_CONFIG_PATH";

/// Config files searched for in the working directory, in order.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["fingraph.yaml", "fingraph.toml"];

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The file extension is neither YAML nor TOML.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Environment variable parsing error.
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// Parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for FinGraphError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse a configuration file, choosing YAML or TOML by extension.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from a file with environment variable overrides.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FinGraphResult<Config> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");

        let mut config = Self::parse_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from environment variables and files.
    ///
    /// Checks `FINGRAPH_CONFIG_PATH`, then `fingraph.yaml` and `fingraph.toml`
    /// in the working directory, and falls back to defaults.
    pub fn load() -> FinGraphResult<Config> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            return Self::load_from_file(config_path);
        }

        if let Some(found) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|candidate| candidate.exists())
        {
            return Self::load_from_file(found);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FINGRAPH_*` environment variable overrides to configuration.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup` instead of the process environment.
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dpi) = lookup("FINGRAPH_DPI") {
            config.render.dpi = dpi.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: "FINGRAPH_DPI".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Some(months) = lookup("FINGRAPH_DEFAULT_MONTHS") {
            config.data.default_months =
                months
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::EnvParseError {
                        var: "FINGRAPH_DEFAULT_MONTHS".to_string(),
                        source: Box::new(e),
                    })?;
        }

        if let Some(dir) = lookup("FINGRAPH_OUTPUT_DIR") {
            config.export.output_dir = dir.into();
        }

        if let Some(level) = lookup("FINGRAPH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
