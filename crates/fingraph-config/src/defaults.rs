//! Default values for every configuration section.

use crate::schema::{DataConfig, ExportConfig, LoggingSettings, RenderConfig};
use std::path::PathBuf;

/// The ten-color categorical palette used when none is configured.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 100;

/// Default look-back window in months.
pub const DEFAULT_MONTHS: u32 = 6;

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            background: "#ffffff".to_string(),
            font_family: "sans-serif".to_string(),
            title_font_size: 16,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_months: DEFAULT_MONTHS,
            currency_symbol: "$".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}
