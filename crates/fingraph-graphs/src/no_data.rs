//! Placeholder chart shown when a range has nothing to plot.

use crate::traits::{render_png, text_style, GraphRenderer};
use crate::types::{ChartKind, FigureSize, GraphConfig};
use fingraph_common::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Renders the chart title with a centred message and no axes.
#[derive(Debug, Clone, Copy)]
pub struct NoDataGraph {
    figure: FigureSize,
}

impl NoDataGraph {
    /// Placeholder drawn at the size of the chart it stands in for.
    pub const fn new(figure: FigureSize) -> Self {
        Self { figure }
    }
}

impl Default for NoDataGraph {
    fn default() -> Self {
        Self::new(FigureSize::BAR)
    }
}

impl GraphRenderer for NoDataGraph {
    /// The message to show.
    type Data = String;

    fn render(&self, message: &String, config: &GraphConfig) -> Result<Vec<u8>> {
        let background = self.get_background_color(config);
        let style = &config.style;

        let png = render_png(config.width, config.height, |root| {
            root.fill(&background)?;
            let area = root.titled(
                &config.title,
                text_style(&style.title_font.family, style.title_font.size, &BLACK),
            )?;

            let (width, height) = area.dim_in_pixel();
            let centre = (
                i32::try_from(width / 2).unwrap_or(0),
                i32::try_from(height / 2).unwrap_or(0),
            );
            area.draw(&Text::new(
                message.clone(),
                centre,
                text_style(&style.label_font.family, style.label_font.size * 2, &BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;
            Ok(())
        })?;

        tracing::warn!(chart = %config.title, %message, "Rendered no-data placeholder");
        Ok(png)
    }

    fn name(&self) -> &'static str {
        "no_data"
    }

    fn description(&self) -> &'static str {
        "Placeholder with a centred message for empty ranges"
    }

    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn figure_size(&self) -> FigureSize {
        self.figure
    }
}
