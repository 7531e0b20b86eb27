//! Writing charts and series to disk.
//!
//! Every export reports success as a `bool`. Failures are logged and never
//! propagate past this module.

use crate::aggregator::{CashFlowSeries, DashboardSummary};
use crate::period::cumulative_sum;
use fingraph_common::{FinGraphError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Serialize)]
struct MonthRow<'a> {
    month: &'a str,
    income: f64,
    expense: f64,
    net: f64,
    cumulative: f64,
}

/// Write chart bytes to `path`, creating missing parent directories.
pub fn export_chart_to_file(bytes: &[u8], path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    report(path, "chart", write_bytes(bytes, path))
}

/// Write the monthly series as CSV: month, income, expense, net, cumulative.
pub fn export_series_csv(series: &CashFlowSeries, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    report(path, "series", write_series(series, path))
}

/// Write the dashboard summary as pretty-printed JSON.
pub fn export_summary_json(summary: &DashboardSummary, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let written = summary
        .to_json()
        .and_then(|json| write_bytes(json.as_bytes(), path));
    report(path, "summary", written)
}

fn report(path: &Path, what: &str, outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => {
            info!(path = %path.display(), what, "Exported");
            true
        }
        Err(e) => {
            error!(path = %path.display(), what, error = %e, "Export failed");
            false
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| FinGraphError::export_with_source(path, "could not create directory", e)),
        _ => Ok(()),
    }
}

fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, bytes)
        .map_err(|e| FinGraphError::export_with_source(path, "could not write file", e))
}

fn write_series(series: &CashFlowSeries, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let cumulative = cumulative_sum(&series.net);
    let mut writer = csv::Writer::from_path(path)?;

    for (i, month) in series.labels.iter().enumerate() {
        writer.serialize(MonthRow {
            month,
            income: series.income.get(i).copied().unwrap_or_default(),
            expense: series.expense.get(i).copied().unwrap_or_default(),
            net: series.net.get(i).copied().unwrap_or_default(),
            cumulative: cumulative.get(i).copied().unwrap_or_default(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
