//! Expenses by category, as a pie or a horizontal bar chart.

use crate::aggregator::{CategoryDistribution, NO_EXPENSE_DATA};
use crate::traits::{pick_color, render_png, text_style, BufferArea, GraphRenderer};
use crate::types::{ChartKind, FigureSize, GraphConfig};
use crate::utils::GraphUtils;
use fingraph_common::{format_amount, format_percentage, truncate_string, FinGraphError, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Longest category name shown on an axis or next to a wedge.
const MAX_NAME_LENGTH: usize = 20;

/// Where the first wedge starts, counter-clockwise from 3 o'clock.
const START_ANGLE: f64 = 90.0;

/// Category breakdown renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryBreakdownGraph {
    kind: ChartKind,
}

impl CategoryBreakdownGraph {
    /// Pie for [`ChartKind::Pie`], horizontal bars for anything else.
    pub const fn new(kind: ChartKind) -> Self {
        let kind = match kind {
            ChartKind::Pie => ChartKind::Pie,
            _ => ChartKind::Bar,
        };
        Self { kind }
    }

    /// Pie chart renderer.
    pub const fn pie() -> Self {
        Self::new(ChartKind::Pie)
    }

    /// Horizontal bar chart renderer.
    pub const fn bar() -> Self {
        Self::new(ChartKind::Bar)
    }

    fn draw_pie(
        &self,
        root: &BufferArea<'_>,
        data: &CategoryDistribution,
        config: &GraphConfig,
    ) -> Result<()> {
        let style = &config.style;
        let colors = self.get_colors(config);
        let area = root.titled(
            &config.title,
            text_style(&style.title_font.family, style.title_font.size, &BLACK),
        )?;

        let (width, height) = area.dim_in_pixel();
        let centre = (f64::from(width) / 2.0, f64::from(height) / 2.0);
        let radius = f64::from(width.min(height)) * 0.36;

        let mut start = START_ANGLE;
        for (i, slice) in data.slices.iter().enumerate() {
            let sweep = slice.percentage / 100.0 * 360.0;
            let color = pick_color(&colors, i);

            area.draw(&Polygon::new(
                wedge_points(centre, radius, start, start + sweep),
                color.filled(),
            ))?;

            let middle = start + sweep / 2.0;
            area.draw(&Text::new(
                format_percentage(slice.percentage),
                polar(centre, radius * 0.62, middle),
                text_style(&style.label_font.family, style.label_font.size, &BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;

            let outside = if middle.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            area.draw(&Text::new(
                truncate_string(&slice.name, MAX_NAME_LENGTH),
                polar(centre, radius * 1.08, middle),
                text_style(&style.label_font.family, style.label_font.size, &BLACK)
                    .pos(Pos::new(outside, VPos::Center)),
            ))?;

            start += sweep;
        }
        Ok(())
    }

    fn draw_bars(
        &self,
        root: &BufferArea<'_>,
        data: &CategoryDistribution,
        config: &GraphConfig,
    ) -> Result<()> {
        let style = &config.style;
        let colors = self.get_colors(config);
        let count = data.slices.len();

        // Largest category on top
        let names: Vec<String> = data
            .slices
            .iter()
            .rev()
            .map(|slice| truncate_string(&slice.name, MAX_NAME_LENGTH))
            .collect();

        let x_range = GraphUtils::value_range(data.slices.iter().map(|s| s.amount * 1.1));
        let offset = GraphUtils::label_offset(&x_range) / 2.0;
        let x_axis = config
            .x_label
            .clone()
            .unwrap_or_else(|| format!("Amount ({})", config.currency_symbol));

        let mut chart = ChartBuilder::on(root)
            .caption(
                &config.title,
                text_style(&style.title_font.family, style.title_font.size, &BLACK),
            )
            .margin(style.margins.top)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left * 2)
            .build_cartesian_2d(x_range, GraphUtils::index_range(count))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(count)
            .y_label_formatter(&|y| GraphUtils::slot_label(&names, *y))
            .x_label_formatter(&|x| format_amount(*x, &config.currency_symbol, 0))
            .x_desc(x_axis)
            .label_style(text_style(&style.label_font.family, style.label_font.size, &BLACK))
            .draw()?;

        for (i, slice) in data.slices.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = (count - 1 - i) as f64;
            let color = pick_color(&colors, i);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(0.0, y - 0.35), (slice.amount, y + 0.35)],
                color.filled(),
            )))?;

            chart.draw_series(std::iter::once(Text::new(
                format_amount(slice.amount, &config.currency_symbol, 2),
                (slice.amount + offset, y),
                text_style(&style.label_font.family, style.label_font.size, &BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Center)),
            )))?;
        }
        Ok(())
    }
}

impl Default for CategoryBreakdownGraph {
    fn default() -> Self {
        Self::pie()
    }
}

impl GraphRenderer for CategoryBreakdownGraph {
    type Data = CategoryDistribution;

    fn render(&self, data: &CategoryDistribution, config: &GraphConfig) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(FinGraphError::no_data(NO_EXPENSE_DATA));
        }
        GraphUtils::ensure_finite("category amounts", data.slices.iter().map(|s| &s.amount))?;

        let background = self.get_background_color(config);
        let png = render_png(config.width, config.height, |root| {
            root.fill(&background)?;
            match self.kind {
                ChartKind::Pie => self.draw_pie(root, data, config),
                _ => self.draw_bars(root, data, config),
            }
        })?;

        tracing::info!(
            chart = self.name(),
            kind = ?self.kind,
            categories = data.slices.len(),
            bytes = png.len(),
            "Rendered chart"
        );
        Ok(png)
    }

    fn name(&self) -> &'static str {
        "category_breakdown"
    }

    fn description(&self) -> &'static str {
        "Share of expenses per category over the selected period"
    }

    fn kind(&self) -> ChartKind {
        self.kind
    }

    fn figure_size(&self) -> FigureSize {
        match self.kind {
            ChartKind::Pie => FigureSize::PIE,
            _ => FigureSize::BAR,
        }
    }
}

/// Pixel position at `angle` degrees, counter-clockwise, `distance` from `centre`.
#[allow(clippy::cast_possible_truncation)]
fn polar(centre: (f64, f64), distance: f64, angle: f64) -> (i32, i32) {
    let radians = angle.to_radians();
    (
        (centre.0 + distance * radians.cos()).round() as i32,
        (centre.1 - distance * radians.sin()).round() as i32,
    )
}

/// Outline of a wedge: the centre followed by points along the arc.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn wedge_points(centre: (f64, f64), radius: f64, from: f64, to: f64) -> Vec<(i32, i32)> {
    let steps = ((to - from).abs().ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(polar(centre, 0.0, from));
    points.extend((0..=steps).map(|step| {
        let angle = from + (to - from) * step as f64 / steps as f64;
        polar(centre, radius, angle)
    }));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::CategorySlice;
    use fingraph_common::CategoryId;

    fn distribution() -> CategoryDistribution {
        CategoryDistribution {
            slices: vec![
                CategorySlice {
                    id: CategoryId(2),
                    name: "Rent".to_string(),
                    amount: 1500.0,
                    percentage: 75.0,
                },
                CategorySlice {
                    id: CategoryId(1),
                    name: "Groceries".to_string(),
                    amount: 500.0,
                    percentage: 25.0,
                },
            ],
            total: 2000.0,
        }
    }

    #[test]
    fn test_kind_selection() {
        assert_eq!(CategoryBreakdownGraph::new(ChartKind::Pie).kind(), ChartKind::Pie);
        assert_eq!(CategoryBreakdownGraph::new(ChartKind::Line).kind(), ChartKind::Bar);
        assert_eq!(CategoryBreakdownGraph::pie().figure_size(), FigureSize::PIE);
        assert_eq!(CategoryBreakdownGraph::bar().figure_size(), FigureSize::BAR);
    }

    #[test]
    fn test_empty_distribution_is_no_data() {
        let empty = CategoryDistribution {
            slices: Vec::new(),
            total: 0.0,
        };
        let err = CategoryBreakdownGraph::pie()
            .render(&empty, &GraphConfig::default())
            .unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_polar_axes() {
        assert_eq!(polar((100.0, 100.0), 50.0, 0.0), (150, 100));
        assert_eq!(polar((100.0, 100.0), 50.0, 90.0), (100, 50));
        assert_eq!(polar((100.0, 100.0), 50.0, 180.0), (50, 100));
    }

    #[test]
    fn test_wedge_points_span_arc() {
        let points = wedge_points((0.0, 0.0), 10.0, 90.0, 180.0);
        assert_eq!(points[0], (0, 0));
        assert_eq!(points[1], (0, -10));
        assert_eq!(*points.last().unwrap(), (-10, 0));
        assert_eq!(points.len(), 92);
    }

    #[test]
    fn test_render_sizes() {
        let config = GraphConfig::default();
        for graph in [CategoryBreakdownGraph::pie(), CategoryBreakdownGraph::bar()] {
            let png = graph.render(&distribution(), &config).unwrap();
            let decoded = image::load_from_memory(&png).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (config.width, config.height));
        }
    }
}
