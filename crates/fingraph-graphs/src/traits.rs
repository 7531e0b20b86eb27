//! Graph renderer trait and the shared PNG pipeline.

use crate::types::{ChartKind, FigureSize, GraphConfig};
use fingraph_config::RenderConfig;
use fingraph_common::{FinGraphError, Result};
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Colors used when the configured palette is empty.
pub const DEFAULT_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

/// Drawing area over an in-memory RGB buffer.
pub type BufferArea<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Trait for graph renderers that turn aggregated data into PNG bytes.
pub trait GraphRenderer {
    /// The type of data this renderer expects.
    type Data;

    /// Renders the data to PNG bytes.
    fn render(&self, data: &Self::Data, config: &GraphConfig) -> Result<Vec<u8>>;

    /// Gets the name of this graph type.
    fn name(&self) -> &'static str;

    /// Gets the description of this graph type.
    fn description(&self) -> &'static str;

    /// The kind of chart this renderer draws.
    fn kind(&self) -> ChartKind;

    /// Figure size in inches at which this chart is drawn.
    fn figure_size(&self) -> FigureSize;

    /// Graph configuration for this chart at the configured DPI.
    fn default_config(&self, render: &RenderConfig, title: &str) -> GraphConfig {
        GraphConfig::from_render(render, self.figure_size(), title)
    }

    /// Palette colors, falling back to [`DEFAULT_COLORS`].
    fn get_colors(&self, config: &GraphConfig) -> Vec<RGBColor> {
        if config.style.palette.is_empty() {
            DEFAULT_COLORS.to_vec()
        } else {
            config
                .style
                .palette
                .iter()
                .map(|color| self.parse_color(color))
                .collect()
        }
    }

    /// Parse a `#rrggbb` color, black if malformed.
    fn parse_color(&self, color_str: &str) -> RGBColor {
        parse_hex_color(color_str).unwrap_or(BLACK)
    }

    /// Background color, white if malformed.
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        parse_hex_color(&config.style.background_color).unwrap_or(WHITE)
    }
}

/// The palette entry at `index`, cycling.
pub fn pick_color(colors: &[RGBColor], index: usize) -> RGBColor {
    if colors.is_empty() {
        DEFAULT_COLORS[index % DEFAULT_COLORS.len()]
    } else {
        colors[index % colors.len()]
    }
}

/// Parse a `#rrggbb` color.
pub fn parse_hex_color(color_str: &str) -> Option<RGBColor> {
    let hex = color_str.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Draw into a fresh RGB buffer and encode the result as PNG.
pub fn render_png<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&BufferArea<'_>) -> Result<()>,
{
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(&root)?;
        root.present()?;
    }
    encode_png(&buffer, width, height)
}

/// Encode a packed RGB8 buffer as PNG.
pub fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * 3;
    if buffer.len() != expected {
        return Err(FinGraphError::graph(format!(
            "RGB buffer holds {} bytes, {width}x{height} needs {expected}",
            buffer.len()
        )));
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(buffer, width, height, ColorType::Rgb8)
        .map_err(|e| FinGraphError::graph_with_source("PNG encoding failed", e))?;
    Ok(png)
}

/// Text style with the given family, size and color.
pub fn text_style<'a>(family: &'a str, size: u32, color: &RGBColor) -> TextStyle<'a> {
    (family, f64::from(size)).into_font().color(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    struct MockRenderer;

    impl GraphRenderer for MockRenderer {
        type Data = ();

        fn render(&self, _data: &(), config: &GraphConfig) -> Result<Vec<u8>> {
            let background = self.get_background_color(config);
            render_png(config.width, config.height, |root| {
                root.fill(&background)?;
                Ok(())
            })
        }

        fn name(&self) -> &'static str {
            "mock"
        }

        fn description(&self) -> &'static str {
            "Fills the background"
        }

        fn kind(&self) -> ChartKind {
            ChartKind::Bar
        }

        fn figure_size(&self) -> FigureSize {
            FigureSize::new(0.4, 0.3)
        }
    }

    #[test]
    fn test_color_parsing() {
        let renderer = MockRenderer;
        assert_eq!(renderer.parse_color("#FF0000"), RGBColor(255, 0, 0));
        assert_eq!(renderer.parse_color("#1f77b4"), RGBColor(31, 119, 180));
        assert_eq!(renderer.parse_color("invalid"), BLACK);
        assert_eq!(renderer.parse_color("#12345"), BLACK);
        assert_eq!(renderer.parse_color("#ééé"), BLACK);
    }

    #[test]
    fn test_palette_fallback() {
        let renderer = MockRenderer;
        let mut config = GraphConfig::default();
        assert_eq!(renderer.get_colors(&config)[0], RGBColor(31, 119, 180));
        assert_eq!(renderer.get_colors(&config)[9], RGBColor(23, 190, 207));

        config.style.palette = vec!["#000000".to_string(), "#ffffff".to_string()];
        assert_eq!(renderer.get_colors(&config), vec![BLACK, WHITE]);

        config.style.palette.clear();
        assert_eq!(renderer.get_colors(&config).len(), DEFAULT_COLORS.len());
    }

    #[test]
    fn test_background_color() {
        let renderer = MockRenderer;
        let mut config = GraphConfig::default();
        config.style.background_color = "#000000".to_string();
        assert_eq!(renderer.get_background_color(&config), BLACK);

        config.style.background_color = "transparent".to_string();
        assert_eq!(renderer.get_background_color(&config), WHITE);
    }

    #[test]
    fn test_pick_color_cycles() {
        let colors = [BLACK, WHITE];
        assert_eq!(pick_color(&colors, 3), WHITE);
        assert_eq!(pick_color(&[], 11), DEFAULT_COLORS[1]);
    }

    #[test]
    fn test_render_png_without_text() {
        let config = MockRenderer.default_config(&RenderConfig::default(), "Mock");
        assert_eq!(config.title, "Mock");
        let png = MockRenderer.render(&(), &config).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (40, 30));
        assert_eq!(decoded.get_pixel(20, 15).0, [255, 255, 255]);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        assert!(encode_png(&[0u8; 3], 4, 4).is_err());
    }
}
