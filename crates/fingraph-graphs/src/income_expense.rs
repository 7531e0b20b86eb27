//! Monthly income and expenses as grouped bars with a net line.

use crate::aggregator::CashFlowSeries;
use crate::traits::{pick_color, render_png, text_style, GraphRenderer};
use crate::types::{ChartKind, FigureSize, GraphConfig};
use crate::utils::GraphUtils;
use fingraph_common::{format_amount, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const BAR_WIDTH: f64 = 0.35;

/// Palette slots for the three series.
const INCOME_SLOT: usize = 2;
const EXPENSE_SLOT: usize = 3;
const NET_SLOT: usize = 0;

/// Income vs expense renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeExpenseGraph;

impl IncomeExpenseGraph {
    /// Create a new income vs expense renderer.
    pub const fn new() -> Self {
        Self
    }
}

impl GraphRenderer for IncomeExpenseGraph {
    type Data = CashFlowSeries;

    #[allow(clippy::cast_precision_loss, clippy::too_many_lines)]
    fn render(&self, data: &CashFlowSeries, config: &GraphConfig) -> Result<Vec<u8>> {
        GraphUtils::ensure_finite("income", &data.income)?;
        GraphUtils::ensure_finite("expense", &data.expense)?;
        GraphUtils::ensure_finite("net", &data.net)?;

        let style = &config.style;
        let colors = self.get_colors(config);
        let background = self.get_background_color(config);
        let income_color = pick_color(&colors, INCOME_SLOT);
        let expense_color = pick_color(&colors, EXPENSE_SLOT);
        let net_color = pick_color(&colors, NET_SLOT);
        let symbol = config.currency_symbol.as_str();

        let y_range = GraphUtils::value_range(
            data.income
                .iter()
                .chain(&data.expense)
                .chain(&data.net)
                .copied(),
        );
        let offset = GraphUtils::label_offset(&y_range);
        let x_range = GraphUtils::index_range(data.labels.len());
        let x_axis = config.x_label.clone().unwrap_or_else(|| "Month".to_string());
        let y_axis = config
            .y_label
            .clone()
            .unwrap_or_else(|| format!("Amount ({symbol})"));

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
                .build_cartesian_2d(x_range.clone(), y_range.clone())?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(data.labels.len())
                .x_label_formatter(&|x| GraphUtils::slot_label(&data.labels, *x))
                .y_label_formatter(&|y| format_amount(*y, symbol, 0))
                .x_desc(x_axis.as_str())
                .y_desc(y_axis.as_str())
                .label_style(label_style.clone())
                .draw()?;

            // Zero baseline
            chart.draw_series(LineSeries::new(
                [(x_range.start, 0.0), (x_range.end, 0.0)],
                BLACK.mix(0.3).stroke_width(1),
            ))?;

            chart
                .draw_series(data.income.iter().enumerate().map(|(i, value)| {
                    let x = i as f64 - BAR_WIDTH / 2.0;
                    Rectangle::new(
                        [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, *value)],
                        income_color.filled(),
                    )
                }))?
                .label("Income")
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], income_color.filled()));

            chart
                .draw_series(data.expense.iter().enumerate().map(|(i, value)| {
                    let x = i as f64 + BAR_WIDTH / 2.0;
                    Rectangle::new(
                        [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, *value)],
                        expense_color.filled(),
                    )
                }))?
                .label("Expenses")
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], expense_color.filled()));

            let net_points = data.net_points();
            chart
                .draw_series(LineSeries::new(
                    net_points.iter().map(|p| (p.bucket_index as f64, p.value)),
                    net_color.stroke_width(2),
                ))?
                .label("Net")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], net_color.stroke_width(2)));
            chart.draw_series(
                net_points
                    .iter()
                    .map(|p| Circle::new((p.bucket_index as f64, p.value), 4, net_color.filled())),
            )?;

            let above = Pos::new(HPos::Center, VPos::Bottom);
            let below = Pos::new(HPos::Center, VPos::Top);
            for (i, (income, expense)) in data.income.iter().zip(&data.expense).enumerate() {
                let x = i as f64;
                chart.draw_series([
                    Text::new(
                        format_amount(*income, symbol, 0),
                        (x - BAR_WIDTH / 2.0, income + offset),
                        value_style.pos(above),
                    ),
                    Text::new(
                        format_amount(*expense, symbol, 0),
                        (x + BAR_WIDTH / 2.0, expense + offset),
                        value_style.pos(above),
                    ),
                ])?;
            }
            for point in &net_points {
                let (y, pos) = if point.value >= 0.0 {
                    (point.value + offset * 2.5, above)
                } else {
                    (point.value - offset * 2.5, below)
                };
                chart.draw_series(std::iter::once(Text::new(
                    format_amount(point.value, symbol, 0),
                    (point.bucket_index as f64, y),
                    value_style.pos(pos),
                )))?;
            }

            chart
                .configure_series_labels()
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
        "income_expense"
    }

    fn description(&self) -> &'static str {
        "Monthly income and expenses with the net result per month"
    }

    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn figure_size(&self) -> FigureSize {
        FigureSize::CASH_FLOW
    }
}
