//! Monthly savings bars with the running total on a secondary axis.

use crate::aggregator::SavingsSeries;
use crate::traits::{pick_color, render_png, text_style, GraphRenderer};
use crate::types::{ChartKind, FigureSize, GraphConfig};
use crate::utils::GraphUtils;
use fingraph_common::{format_amount, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const BAR_WIDTH: f64 = 0.6;

/// Savings trend renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SavingsTrendGraph;

impl SavingsTrendGraph {
    /// Create a new savings trend renderer.
    pub const fn new() -> Self {
        Self
    }
}

impl GraphRenderer for SavingsTrendGraph {
    type Data = SavingsSeries;

    #[allow(clippy::cast_precision_loss)]
    fn render(&self, data: &SavingsSeries, config: &GraphConfig) -> Result<Vec<u8>> {
        GraphUtils::ensure_finite("monthly savings", &data.monthly)?;
        GraphUtils::ensure_finite("cumulative savings", &data.cumulative)?;

        let style = &config.style;
        let colors = self.get_colors(config);
        let background = self.get_background_color(config);
        let bar_color = pick_color(&colors, 2);
        let line_color = pick_color(&colors, 0);
        let symbol = config.currency_symbol.as_str();

        let x_range = GraphUtils::index_range(data.labels.len());
        let monthly_range = GraphUtils::value_range(data.monthly.iter().copied());
        let cumulative_range = GraphUtils::value_range(data.cumulative.iter().copied());
        let bar_offset = GraphUtils::label_offset(&monthly_range);
        let line_offset = GraphUtils::label_offset(&cumulative_range) * 1.5;

        let png = render_png(config.width, config.height, |root| {
            root.fill(&background)?;
            let label_style = text_style(&style.label_font.family, style.label_font.size, &BLACK);
            let value_style =
                text_style(&style.label_font.family, style.label_font.size * 4 / 5, &BLACK);

            let mut chart = ChartBuilder::on(root)
                .caption(
                    &config.title,
                    text_style(&style.title_font.family, style.title_font.size, &BLACK),
                )
                .margin(style.margins.top)
                .x_label_area_size(style.margins.bottom)
                .y_label_area_size(style.margins.left)
                .right_y_label_area_size(style.margins.left)
                .build_cartesian_2d(x_range.clone(), monthly_range.clone())?
                .set_secondary_coord(x_range.clone(), cumulative_range.clone());

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(data.labels.len())
                .x_label_formatter(&|x| GraphUtils::slot_label(&data.labels, *x))
                .y_label_formatter(&|y| format_amount(*y, symbol, 0))
                .x_desc(config.x_label.as_deref().unwrap_or("Month"))
                .y_desc(format!("Monthly Savings ({symbol})"))
                .label_style(label_style.clone())
                .axis_desc_style(text_style(&style.label_font.family, style.label_font.size, &bar_color))
                .draw()?;

            chart
                .configure_secondary_axes()
                .y_label_formatter(&|y| format_amount(*y, symbol, 0))
                .y_desc(format!("Cumulative Savings ({symbol})"))
                .label_style(label_style.clone())
                .axis_desc_style(text_style(&style.label_font.family, style.label_font.size, &line_color))
                .draw()?;

            chart.draw_series(LineSeries::new(
                [(x_range.start, 0.0), (x_range.end, 0.0)],
                BLACK.mix(0.3).stroke_width(1),
            ))?;

            chart
                .draw_series(data.monthly.iter().enumerate().map(|(i, value)| {
                    let x = i as f64;
                    Rectangle::new(
                        [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, *value)],
                        bar_color.mix(0.7).filled(),
                    )
                }))?
                .label("Monthly Savings")
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], bar_color.filled()));

            chart
                .draw_secondary_series(LineSeries::new(
                    data.cumulative.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                    line_color.stroke_width(2),
                ))?
                .label("Cumulative Savings")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2)));
            chart.draw_secondary_series(
                data.cumulative
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Circle::new((i as f64, *v), 4, line_color.filled())),
            )?;

            chart.draw_series(data.monthly.iter().enumerate().map(|(i, value)| {
                let (y, pos) = if *value >= 0.0 {
                    (value + bar_offset, Pos::new(HPos::Center, VPos::Bottom))
                } else {
                    (value - bar_offset, Pos::new(HPos::Center, VPos::Top))
                };
                Text::new(format_amount(*value, symbol, 0), (i as f64, y), value_style.pos(pos))
            }))?;

            chart.draw_secondary_series(data.cumulative.iter().enumerate().map(|(i, value)| {
                Text::new(
                    format_amount(*value, symbol, 0),
                    (i as f64, value + line_offset),
                    value_style.pos(Pos::new(HPos::Center, VPos::Bottom)),
                )
            }))?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(label_style)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
            Ok(())
        })?;

        tracing::info!(chart = self.name(), months = data.labels.len(), bytes = png.len(), "Rendered chart");
        Ok(png)
    }

    fn name(&self) -> &'static str {
        "savings_trend"
    }

    fn description(&self) -> &'static str {
        "Monthly savings with the cumulative total on a secondary axis"
    }

    fn kind(&self) -> ChartKind {
        ChartKind::DualAxis
    }

    fn figure_size(&self) -> FigureSize {
        FigureSize::SAVINGS
    }
}
