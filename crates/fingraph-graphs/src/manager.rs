//! Chart manager that renders individual charts and assembles the dashboard.

use crate::aggregator::{CategoryDistribution, DashboardSummary, PeriodAggregator};
use crate::category_breakdown::CategoryBreakdownGraph;
use crate::export;
use crate::income_expense::IncomeExpenseGraph;
use crate::no_data::NoDataGraph;
use crate::period::DateRange;
use crate::savings_trend::SavingsTrendGraph;
use crate::source::BudgetDataSource;
use crate::spending_trends::SpendingTrendsGraph;
use crate::traits::GraphRenderer;
use crate::types::{ChartKind, GraphConfig};
use chrono::{Local, NaiveDate};
use fingraph_common::{CategoryId, FinGraphError, Result, UserId};
use fingraph_config::Config;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Title of the category breakdown chart.
pub const CATEGORY_TITLE: &str = "Expenses by Category";
/// Title of the income vs expense chart.
pub const CASH_FLOW_TITLE: &str = "Monthly Income vs Expenses";
/// Title of the savings chart.
pub const SAVINGS_TITLE: &str = "Monthly and Cumulative Savings";
/// Title of the spending trends chart.
pub const TRENDS_TITLE: &str = "Monthly Spending Trends by Category";

/// A dashboard chart that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartFailure {
    /// Dashboard slot name.
    pub chart: &'static str,
    /// Rendering error.
    pub message: String,
}

/// Rendered charts plus summary scalars for one user and range.
///
/// A chart slot is `None` when its rendering failed; the matching entry in
/// `failures` says why.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Income vs expense PNG.
    pub income_expense_chart: Option<Vec<u8>>,
    /// Category breakdown PNG.
    pub category_distribution_chart: Option<Vec<u8>>,
    /// Savings trend PNG.
    pub savings_chart: Option<Vec<u8>>,
    /// Spending trends PNG.
    pub spending_trends_chart: Option<Vec<u8>>,
    /// Whole-range totals.
    pub summary_stats: DashboardSummary,
    /// Charts left out, in render order.
    pub failures: Vec<ChartFailure>,
}

impl Dashboard {
    /// Whether every chart rendered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Rendered charts by slot name.
    pub fn charts(&self) -> impl Iterator<Item = (&'static str, &[u8])> {
        [
            ("income_expense_chart", &self.income_expense_chart),
            ("category_distribution_chart", &self.category_distribution_chart),
            ("savings_chart", &self.savings_chart),
            ("spending_trends_chart", &self.spending_trends_chart),
        ]
        .into_iter()
        .filter_map(|(name, chart)| chart.as_deref().map(|bytes| (name, bytes)))
    }
}

/// Renders charts for a data source using read-only configuration.
///
/// The data source is borrowed per call and never stored.
#[derive(Debug, Clone)]
pub struct ChartManager {
    config: Config,
    aggregator: PeriodAggregator,
    today: Option<NaiveDate>,
}

impl Default for ChartManager {
    fn default() -> Self {
        Self::from_valid(Config::default())
    }
}

impl ChartManager {
    /// Creates a new chart manager.
    ///
    /// The configuration is validated first, so an out-of-range DPI never
    /// reaches the pixel buffers.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: Config) -> Self {
        let aggregator = PeriodAggregator::from_config(&config.data);
        Self {
            config,
            aggregator,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Configuration in use.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Aggregator in use.
    pub const fn aggregator(&self) -> &PeriodAggregator {
        &self.aggregator
    }

    /// The pinned date, or the local date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Validate or default the requested range.
    pub fn resolve_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<DateRange> {
        self.aggregator.resolve_range(start, end, self.today())
    }

    /// Graph configuration for `renderer` with the configured currency.
    pub fn graph_config<R: GraphRenderer>(&self, renderer: &R, title: &str) -> GraphConfig {
        renderer
            .default_config(&self.config.render, title)
            .with_currency(&self.config.data.currency_symbol)
    }

    /// Expenses by category as a pie or bar chart.
    ///
    /// A range without positive spending yields the placeholder chart.
    #[instrument(skip(self, source))]
    pub fn category_chart<S>(
        &self,
        source: &S,
        user: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        kind: ChartKind,
    ) -> Result<Vec<u8>>
    where
        S: BudgetDataSource + ?Sized,
    {
        let range = self.resolve_range(start, end)?;
        let distribution = self.aggregator.category_distribution(source, user, &range);
        self.render_category(distribution, kind)
    }

    /// Monthly income and expenses.
    #[instrument(skip(self, source))]
    pub fn income_expense_chart<S>(
        &self,
        source: &S,
        user: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<u8>>
    where
        S: BudgetDataSource + ?Sized,
    {
        let range = self.resolve_range(start, end)?;
        let flow = self.aggregator.cash_flow(source, user, &range)?;
        let renderer = IncomeExpenseGraph::new();
        renderer.render(&flow, &self.graph_config(&renderer, CASH_FLOW_TITLE))
    }

    /// Monthly and cumulative savings.
    #[instrument(skip(self, source))]
    pub fn savings_chart<S>(
        &self,
        source: &S,
        user: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<u8>>
    where
        S: BudgetDataSource + ?Sized,
    {
        let range = self.resolve_range(start, end)?;
        let savings = self.aggregator.savings(source, user, &range)?;
        let renderer = SavingsTrendGraph::new();
        renderer.render(&savings, &self.graph_config(&renderer, SAVINGS_TITLE))
    }

    /// Monthly spending per category, for `categories` or all of them.
    #[instrument(skip(self, source))]
    pub fn spending_trends_chart<S>(
        &self,
        source: &S,
        user: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        categories: Option<&[CategoryId]>,
    ) -> Result<Vec<u8>>
    where
        S: BudgetDataSource + ?Sized,
    {
        let range = self.resolve_range(start, end)?;
        let trends = self
            .aggregator
            .spending_trends(source, user, &range, categories)?;
        let renderer = SpendingTrendsGraph::new();
        let config = self.graph_config(&renderer, TRENDS_TITLE);
        match renderer.render(&trends, &config) {
            Err(e) if e.is_no_data() => Self::placeholder(&renderer, &config, &e),
            other => other,
        }
    }

    /// Whole-range totals.
    pub fn summary<S>(
        &self,
        source: &S,
        user: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DashboardSummary>
    where
        S: BudgetDataSource + ?Sized,
    {
        let range = self.resolve_range(start, end)?;
        self.aggregator.summary(source, user, &range)
    }

    /// All four charts plus the summary.
    ///
    /// Range and data-source errors abort the dashboard. A chart that fails
    /// to render is left out and listed in [`Dashboard::failures`].
    #[instrument(skip(self, source))]
    pub fn dashboard<S>(
        &self,
        source: &S,
        user: UserId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Dashboard>
    where
        S: BudgetDataSource + ?Sized,
    {
        let range = self.resolve_range(start, end)?;

        let flow = self.aggregator.cash_flow(source, user, &range)?;
        let savings = self.aggregator.savings(source, user, &range)?;
        let trends = self.aggregator.spending_trends(source, user, &range, None)?;
        let distribution = match self.aggregator.category_distribution(source, user, &range) {
            Err(e) if !e.is_no_data() => return Err(e),
            other => other,
        };
        let summary_stats = self.aggregator.summary(source, user, &range)?;

        let mut failures = Vec::new();

        let cash_flow_renderer = IncomeExpenseGraph::new();
        let income_expense_chart = Self::keep(
            &mut failures,
            "income_expense_chart",
            cash_flow_renderer.render(&flow, &self.graph_config(&cash_flow_renderer, CASH_FLOW_TITLE)),
        );

        let category_distribution_chart = Self::keep(
            &mut failures,
            "category_distribution_chart",
            self.render_category(distribution, ChartKind::Pie),
        );

        let savings_renderer = SavingsTrendGraph::new();
        let savings_chart = Self::keep(
            &mut failures,
            "savings_chart",
            savings_renderer.render(&savings, &self.graph_config(&savings_renderer, SAVINGS_TITLE)),
        );

        let trends_renderer = SpendingTrendsGraph::new();
        let trends_config = self.graph_config(&trends_renderer, TRENDS_TITLE);
        let trends_result = match trends_renderer.render(&trends, &trends_config) {
            Err(e) if e.is_no_data() => Self::placeholder(&trends_renderer, &trends_config, &e),
            other => other,
        };
        let spending_trends_chart = Self::keep(&mut failures, "spending_trends_chart", trends_result);

        if failures.is_empty() {
            info!(%user, start = %range.start(), end = %range.end(), "Dashboard complete");
        } else {
            warn!(%user, failed = failures.len(), "Dashboard rendered partially");
        }

        Ok(Dashboard {
            income_expense_chart,
            category_distribution_chart,
            savings_chart,
            spending_trends_chart,
            summary_stats,
            failures,
        })
    }

    /// Export chart bytes under the configured output directory.
    pub fn export_chart(&self, bytes: &[u8], file_name: impl AsRef<Path>) -> bool {
        export::export_chart_to_file(bytes, self.output_path(file_name))
    }

    /// Export every rendered dashboard chart plus its summary.
    ///
    /// Files are named `<slot>.png` and `summary.json` under `dir`, relative
    /// to the configured output directory. Returns how many files were
    /// written.
    pub fn export_dashboard(&self, dashboard: &Dashboard, dir: impl AsRef<Path>) -> usize {
        let dir = self.output_path(dir);
        let charts = dashboard
            .charts()
            .filter(|(name, bytes)| export::export_chart_to_file(bytes, dir.join(format!("{name}.png"))))
            .count();
        let summary = usize::from(export::export_summary_json(
            &dashboard.summary_stats,
            dir.join("summary.json"),
        ));
        charts + summary
    }

    fn output_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config.export.output_dir.join(relative)
    }

    fn render_category(
        &self,
        distribution: Result<CategoryDistribution>,
        kind: ChartKind,
    ) -> Result<Vec<u8>> {
        let renderer = CategoryBreakdownGraph::new(kind);
        let config = self.graph_config(&renderer, CATEGORY_TITLE);
        match distribution.and_then(|d| renderer.render(&d, &config)) {
            Err(e) if e.is_no_data() => Self::placeholder(&renderer, &config, &e),
            other => other,
        }
    }

    fn placeholder<R: GraphRenderer>(
        renderer: &R,
        config: &GraphConfig,
        reason: &FinGraphError,
    ) -> Result<Vec<u8>> {
        let message = match reason {
            FinGraphError::NoData { message } => message.clone(),
            other => other.to_string(),
        };
        NoDataGraph::new(renderer.figure_size()).render(&message, config)
    }

    fn keep(failures: &mut Vec<ChartFailure>, chart: &'static str, result: Result<Vec<u8>>) -> Option<Vec<u8>> {
        match result {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(chart, error = %e, "Chart left out of dashboard");
                failures.push(ChartFailure {
                    chart,
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryBudgetSource;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pinned_today_drives_default_range() {
        let manager = ChartManager::default().with_today(ymd(2024, 3, 15));
        let range = manager.resolve_range(None, Some(ymd(2024, 1, 1))).unwrap();
        assert_eq!(range.start(), ymd(2023, 9, 1));
        assert_eq!(range.end(), ymd(2024, 3, 15));
    }

    #[test]
    fn test_configured_months_and_currency() {
        let mut config = Config::default();
        config.data.default_months = 2;
        config.data.currency_symbol = "€".to_string();
        let manager = ChartManager::new(config).unwrap().with_today(ymd(2024, 1, 10));

        assert_eq!(manager.resolve_range(None, None).unwrap().start(), ymd(2023, 11, 1));
        let graph_config = manager.graph_config(&SavingsTrendGraph::new(), SAVINGS_TITLE);
        assert_eq!(graph_config.currency_symbol, "€");
        assert_eq!((graph_config.width, graph_config.height), (1000, 600));
    }

    #[test]
    fn test_unvalidated_config_is_rejected() {
        let mut config = Config::default();
        config.render.dpi = 100_000;
        let err = ChartManager::new(config).unwrap_err();
        assert!(matches!(
            err,
            FinGraphError::Validation { field: Some(ref f), .. } if f == "render.dpi"
        ));
    }

    #[test]
    fn test_invalid_range_surfaces() {
        let manager = ChartManager::default();
        let err = manager
            .dashboard(
                &MemoryBudgetSource::new(),
                UserId(1),
                Some(ymd(2024, 5, 1)),
                Some(ymd(2024, 4, 1)),
            )
            .unwrap_err();
        assert!(matches!(err, FinGraphError::InvalidRange { .. }));
    }

    #[test]
    fn test_keep_records_failures() {
        let mut failures = Vec::new();
        assert_eq!(
            ChartManager::keep(&mut failures, "savings_chart", Ok(vec![1, 2])),
            Some(vec![1, 2])
        );
        assert!(ChartManager::keep(&mut failures, "savings_chart", Err(FinGraphError::graph("boom"))).is_none());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].chart, "savings_chart");
        assert!(failures[0].message.contains("boom"));
    }

    #[test]
    fn test_dashboard_charts_iterator() {
        let dashboard = Dashboard {
            income_expense_chart: Some(vec![1]),
            category_distribution_chart: None,
            savings_chart: Some(vec![2, 3]),
            spending_trends_chart: None,
            summary_stats: DashboardSummary::from_totals(
                0.0,
                0.0,
                Default::default(),
                &DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31)).unwrap(),
            ),
            failures: vec![ChartFailure {
                chart: "category_distribution_chart",
                message: "Graph error: boom".to_string(),
            }],
        };

        let names: Vec<&str> = dashboard.charts().map(|(name, _)| name).collect();
        assert_eq!(names, ["income_expense_chart", "savings_chart"]);
        assert!(!dashboard.is_complete());
    }
}
