//! One spending line per category over the selected months.

use crate::aggregator::SpendingTrends;
use crate::traits::{pick_color, render_png, text_style, GraphRenderer};
use crate::types::{ChartKind, FigureSize, GraphConfig};
use crate::utils::GraphUtils;
use fingraph_common::{format_amount, truncate_string, FinGraphError, Result};
use plotters::prelude::*;

/// Spending trends renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingTrendsGraph;

impl SpendingTrendsGraph {
    /// Create a new spending trends renderer.
    pub const fn new() -> Self {
        Self
    }
}

impl GraphRenderer for SpendingTrendsGraph {
    type Data = SpendingTrends;

    #[allow(clippy::cast_precision_loss)]
    fn render(&self, data: &SpendingTrends, config: &GraphConfig) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(FinGraphError::no_data("No categories to plot"));
        }
        for (category, values) in data.series.iter() {
            GraphUtils::ensure_finite(&format!("category {category}"), values)?;
        }

        let style = &config.style;
        let colors = self.get_colors(config);
        let background = self.get_background_color(config);
        let symbol = config.currency_symbol.as_str();
        let x_range = GraphUtils::index_range(data.labels.len());
        let y_range = GraphUtils::value_range(
            data.series.iter().flat_map(|(_, values)| values.iter().copied()),
        );

        let png = render_png(config.width, config.height, |root| {
            root.fill(&background)?;
            let label_style = text_style(&style.label_font.family, style.label_font.size, &BLACK);

            let mut chart = ChartBuilder::on(root)
                .caption(
                    &config.title,
                    text_style(&style.title_font.family, style.title_font.size, &BLACK),
                )
                .margin(style.margins.top)
                .x_label_area_size(style.margins.bottom)
                .y_label_area_size(style.margins.left)
                .build_cartesian_2d(x_range, y_range)?;

            chart
                .configure_mesh()
                .x_labels(data.labels.len())
                .x_label_formatter(&|x| GraphUtils::slot_label(&data.labels, *x))
                .y_label_formatter(&|y| format_amount(*y, symbol, 0))
                .x_desc(config.x_label.as_deref().unwrap_or("Month"))
                .y_desc(format!("Amount ({symbol})"))
                .label_style(label_style.clone())
                .draw()?;

            for (i, (category, values)) in data.series.iter().enumerate() {
                let color = pick_color(&colors, i);
                let name = data
                    .names
                    .get(&category)
                    .map_or_else(|| format!("Category {category}"), |name| truncate_string(name, 24));

                chart
                    .draw_series(LineSeries::new(
                        values.iter().enumerate().map(|(x, v)| (x as f64, *v)),
                        color.stroke_width(2),
                    ))?
                    .label(name)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
                chart.draw_series(
                    values
                        .iter()
                        .enumerate()
                        .map(|(x, v)| Circle::new((x as f64, *v), 4, color.filled())),
                )?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font(label_style)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
            Ok(())
        })?;

        tracing::info!(
            chart = self.name(),
            categories = data.series.category_count(),
            months = data.labels.len(),
            bytes = png.len(),
            "Rendered chart"
        );
        Ok(png)
    }

    fn name(&self) -> &'static str {
        "spending_trends"
    }

    fn description(&self) -> &'static str {
        "Monthly spending per category"
    }

    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn figure_size(&self) -> FigureSize {
        FigureSize::TRENDS
    }
}
