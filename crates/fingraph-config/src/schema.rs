//! Configuration schema definitions using serde.

use fingraph_common::{LoggingConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validator::ConfigValidator;

/// Main configuration structure for FinGraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chart rendering configuration.
    pub render: RenderConfig,
    /// Period and formatting configuration.
    pub data: DataConfig,
    /// File export configuration.
    pub export: ExportConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Chart rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Dots per inch used to turn figure sizes into pixels.
    pub dpi: u32,
    /// Series colors as `#rrggbb`, cycled when a chart needs more.
    pub palette: Vec<String>,
    /// Background color as `#rrggbb`.
    pub background: String,
    /// Font family for titles and labels.
    pub font_family: String,
    /// Title font size in points.
    pub title_font_size: u32,
}

/// Period and formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// How many months back the default range reaches.
    pub default_months: u32,
    /// Currency symbol used in value labels.
    pub currency_symbol: String,
}

/// File export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that exported charts and series are written under.
    pub output_dir: PathBuf,
}

/// Logging configuration as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `fingraph_graphs=debug`.
    pub level: String,
    /// Write newline-delimited JSON instead of human-readable text.
    pub json: bool,
    /// Append log output to this file instead of stdout.
    pub file: Option<String>,
}

impl LoggingSettings {
    /// Convert into the subscriber settings understood by `fingraph-common`.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            json_format: self.json,
            pretty_format: !self.json,
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}
