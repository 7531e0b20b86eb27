//! Render a dashboard for a small in-memory budget and write it to disk.
//!
//! ```text
//! cargo run -p fingraph-graphs --example render_dashboard
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use fingraph_common::{init_logging, CategoryId, UserId};
use fingraph_config::ConfigLoader;
use fingraph_graphs::{export_series_csv, ChartManager, MemoryBudgetSource};
use tracing::{info, warn};

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).with_context(|| format!("bad date {year}-{month}-{day}"))
}

fn sample_budget(user: UserId) -> Result<MemoryBudgetSource> {
    let groceries = CategoryId(1);
    let rent = CategoryId(2);
    let leisure = CategoryId(3);

    let mut source = MemoryBudgetSource::new()
        .with_category(groceries, "Groceries")
        .with_category(rent, "Rent")
        .with_category(leisure, "Leisure");

    for month in 1..=6 {
        source = source
            .with_income(user, date(2024, month, 25)?, 3100.0)
            .with_expense(user, date(2024, month, 1)?, rent, 1250.0)
            .with_expense(user, date(2024, month, 12)?, groceries, 280.0 + f64::from(month) * 15.0)
            .with_expense(user, date(2024, month, 20)?, leisure, if month % 2 == 0 { 420.0 } else { 90.0 });
    }
    Ok(source)
}

fn main() -> Result<()> {
    let config = ConfigLoader::load().context("loading configuration")?;
    init_logging(config.logging.to_logging_config()).map_err(|e| anyhow!(e))?;

    let user = UserId(1);
    let source = sample_budget(user)?;
    let start = Some(date(2024, 1, 1)?);
    let end = Some(date(2024, 6, 30)?);

    let manager = ChartManager::new(config)?.with_today(date(2024, 6, 30)?);
    let dashboard = manager.dashboard(&source, user, start, end)?;

    for failure in &dashboard.failures {
        warn!(chart = failure.chart, "{}", failure.message);
    }
    let written = manager.export_dashboard(&dashboard, "dashboard");

    let range = manager.resolve_range(start, end)?;
    let flow = manager.aggregator().cash_flow(&source, user, &range)?;
    let csv_path = manager.config().export.output_dir.join("dashboard").join("monthly.csv");
    if !export_series_csv(&flow, &csv_path) {
        warn!(path = %csv_path.display(), "Monthly series was not exported");
    }

    info!(
        files = written,
        savings_rate = dashboard.summary_stats.savings_rate,
        output = %manager.config().export.output_dir.display(),
        "Dashboard exported"
    );
    Ok(())
}
