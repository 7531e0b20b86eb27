//! Chart configuration types.

use fingraph_config::{DataConfig, RenderConfig};
use serde::{Deserialize, Serialize};

/// Kind of chart requested at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Pie chart of shares.
    Pie,
    /// Bar chart.
    Bar,
    /// One line per series.
    Line,
    /// Bars on the primary axis with a line on a secondary axis.
    DualAxis,
}

/// Figure size in inches, turned into pixels with the configured DPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    /// Width in inches.
    pub width: f64,
    /// Height in inches.
    pub height: f64,
}

impl FigureSize {
    /// Category pie chart.
    pub const PIE: Self = Self::new(10.0, 8.0);
    /// Category bar chart.
    pub const BAR: Self = Self::new(10.0, 6.0);
    /// Income vs expense chart.
    pub const CASH_FLOW: Self = Self::new(12.0, 6.0);
    /// Savings trend chart.
    pub const SAVINGS: Self = Self::new(10.0, 6.0);
    /// Spending trends chart.
    pub const TRENDS: Self = Self::new(12.0, 6.0);

    /// Create a figure size in inches.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions at `dpi`, never smaller than one pixel.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixels(self, dpi: u32) -> (u32, u32) {
        let dpi = f64::from(dpi);
        let width = (self.width * dpi).round().max(1.0);
        let height = (self.height * dpi).round().max(1.0);
        (width as u32, height as u32)
    }
}

/// Font configuration, sizes in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font family name.
    pub family: String,
    /// Size in pixels.
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12,
        }
    }
}

/// Margin configuration in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin, also the x label area.
    pub bottom: u32,
    /// Left margin, also the y label area.
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 40,
            left: 60,
        }
    }
}

impl MarginConfig {
    /// Margins scaled from their 100 DPI values.
    pub fn scaled(dpi: u32) -> Self {
        let base = Self::default();
        Self {
            top: scale_to_dpi(base.top, dpi),
            right: scale_to_dpi(base.right, dpi),
            bottom: scale_to_dpi(base.bottom, dpi),
            left: scale_to_dpi(base.left, dpi),
        }
    }
}

/// Styling shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Series colors as `#rrggbb`.
    pub palette: Vec<String>,
    /// Background color as `#rrggbb`.
    pub background_color: String,
    /// Title font.
    pub title_font: FontConfig,
    /// Axis and value label font.
    pub label_font: FontConfig,
    /// Chart margins.
    pub margins: MarginConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::from_render(&RenderConfig::default())
    }
}

impl StyleConfig {
    /// Build the style from the rendering section of the configuration.
    pub fn from_render(render: &RenderConfig) -> Self {
        Self {
            palette: render.palette.clone(),
            background_color: render.background.clone(),
            title_font: FontConfig {
                family: render.font_family.clone(),
                size: points_to_pixels(render.title_font_size, render.dpi),
            },
            label_font: FontConfig {
                family: render.font_family.clone(),
                size: points_to_pixels(10, render.dpi),
            },
            margins: MarginConfig::scaled(render.dpi),
        }
    }
}

/// Everything a renderer needs besides its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Chart title.
    pub title: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// X axis description.
    pub x_label: Option<String>,
    /// Y axis description.
    pub y_label: Option<String>,
    /// Currency symbol for value labels.
    pub currency_symbol: String,
    /// Colors, fonts and margins.
    pub style: StyleConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from_render(&RenderConfig::default(), FigureSize::BAR, "Chart")
    }
}

impl GraphConfig {
    /// Size a chart from a figure in inches and the configured DPI.
    pub fn from_render(render: &RenderConfig, figure: FigureSize, title: impl Into<String>) -> Self {
        let (width, height) = figure.pixels(render.dpi);
        Self {
            title: title.into(),
            width,
            height,
            x_label: None,
            y_label: None,
            currency_symbol: DataConfig::default().currency_symbol,
            style: StyleConfig::from_render(render),
        }
    }

    /// Set axis descriptions.
    #[must_use]
    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = Some(x_label.to_string());
        self.y_label = Some(y_label.to_string());
        self
    }

    /// Set the currency symbol used in value labels.
    #[must_use]
    pub fn with_currency(mut self, symbol: &str) -> Self {
        self.currency_symbol = symbol.to_string();
        self
    }
}

/// Font points to pixels at `dpi`.
fn points_to_pixels(points: u32, dpi: u32) -> u32 {
    ((u64::from(points) * u64::from(dpi) + 36) / 72)
        .try_into()
        .unwrap_or(u32::MAX)
        .max(1)
}

/// Scale a length given at 100 DPI.
fn scale_to_dpi(value: u32, dpi: u32) -> u32 {
    ((u64::from(value) * u64::from(dpi) + 50) / 100)
        .try_into()
        .unwrap_or(u32::MAX)
}
