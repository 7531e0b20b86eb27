//! Monthly aggregation pipeline.
//!
//! [`PeriodAggregator`] turns an optional date range into calendar-month
//! buckets and asks a [`BudgetDataSource`] for one value per bucket. The
//! bucketing and shaping steps are pure; every query goes through an
//! injected fetcher so the pipeline can run against any source.

use crate::period::{self, DateRange, MonthBucket, SeriesPoint};
use crate::source::BudgetDataSource;
use chrono::NaiveDate;
use fingraph_common::{CategoryId, FinGraphError, Result, UserId};
use fingraph_config::{DataConfig, DEFAULT_MONTHS};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Message carried by the empty category distribution.
pub const NO_EXPENSE_DATA: &str = "No expense data available for the selected period";

/// Per-category sequences aligned to a bucket list.
///
/// The key set is fixed when the series is created; every sequence has one
/// value per bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    bucket_count: usize,
    values: BTreeMap<CategoryId, Vec<f64>>,
}

impl CategorySeries {
    /// Zero-filled series for `categories` over `bucket_count` buckets.
    pub fn zeroed(categories: &[CategoryId], bucket_count: usize) -> Self {
        Self {
            bucket_count,
            values: categories
                .iter()
                .map(|id| (*id, vec![0.0; bucket_count]))
                .collect(),
        }
    }

    /// Set one cell, ignoring categories outside the key set.
    pub(crate) fn set(&mut self, category: CategoryId, bucket_index: usize, value: f64) {
        if let Some(cell) = self
            .values
            .get_mut(&category)
            .and_then(|series| series.get_mut(bucket_index))
        {
            *cell = value;
        }
    }

    /// Values for one category.
    pub fn get(&self, category: CategoryId) -> Option<&[f64]> {
        self.values.get(&category).map(Vec::as_slice)
    }

    /// Categories in ascending id order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &[f64])> {
        self.values.iter().map(|(id, values)| (*id, values.as_slice()))
    }

    /// Number of buckets every sequence covers.
    pub const fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Number of categories.
    pub fn category_count(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum over all buckets per category.
    pub fn totals(&self) -> BTreeMap<CategoryId, f64> {
        self.values
            .iter()
            .map(|(id, values)| (*id, values.iter().sum()))
            .collect()
    }
}

/// One category's share of the range's expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    /// Category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Total spent over the range.
    pub amount: f64,
    /// Share of the positive total, in percent.
    pub percentage: f64,
}

/// Positive category totals ordered by descending amount, then id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    /// Slices, largest first.
    pub slices: Vec<CategorySlice>,
    /// Sum of all slice amounts.
    pub total: f64,
}

impl CategoryDistribution {
    /// Build from raw totals, dropping non-positive amounts.
    pub fn from_totals(
        totals: &HashMap<CategoryId, f64>,
        names: &BTreeMap<CategoryId, String>,
    ) -> Self {
        let mut positive: Vec<(CategoryId, f64)> = totals
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(id, amount)| (*id, *amount))
            .collect();
        positive.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let total: f64 = positive.iter().map(|(_, amount)| amount).sum();
        let slices = positive
            .into_iter()
            .map(|(id, amount)| CategorySlice {
                id,
                name: category_name(names, id),
                amount,
                percentage: amount / total * 100.0,
            })
            .collect();

        Self { slices, total }
    }

    /// Whether no category had positive spending.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Monthly income, expense and net, aligned to `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSeries {
    /// Month labels.
    pub labels: Vec<String>,
    /// Income per month.
    pub income: Vec<f64>,
    /// Expenses per month.
    pub expense: Vec<f64>,
    /// Income minus expenses per month.
    pub net: Vec<f64>,
}

impl CashFlowSeries {
    /// Build from aligned income and expense sequences.
    pub fn new(labels: Vec<String>, income: Vec<f64>, expense: Vec<f64>) -> Self {
        let net = income.iter().zip(&expense).map(|(i, e)| i - e).collect();
        Self {
            labels,
            income,
            expense,
            net,
        }
    }

    /// Net values with their bucket positions.
    pub fn net_points(&self) -> Vec<SeriesPoint> {
        period::series_points(&self.net)
    }
}

/// Monthly savings and their running total, aligned to `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsSeries {
    /// Month labels.
    pub labels: Vec<String>,
    /// Savings per month.
    pub monthly: Vec<f64>,
    /// Running total of `monthly`.
    pub cumulative: Vec<f64>,
}

impl SavingsSeries {
    /// Build from monthly savings.
    pub fn new(labels: Vec<String>, monthly: Vec<f64>) -> Self {
        let cumulative = period::cumulative_sum(&monthly);
        Self {
            labels,
            monthly,
            cumulative,
        }
    }
}

/// Per-category spending per month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingTrends {
    /// Month labels.
    pub labels: Vec<String>,
    /// Display names of the plotted categories.
    pub names: BTreeMap<CategoryId, String>,
    /// Aligned values per category.
    pub series: CategorySeries,
}

impl SpendingTrends {
    /// Whether there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// One category's expenses over a summary range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// Category id.
    pub id: CategoryId,
    /// Display name, not necessarily unique.
    pub name: String,
    /// Total spent over the range.
    pub amount: f64,
}

/// Resolved period of a summary, serialized as ISO dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl From<&DateRange> for PeriodSummary {
    fn from(range: &DateRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

/// Whole-range totals shown next to the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Income over the range.
    pub total_income: f64,
    /// Expenses over the range.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net_savings: f64,
    /// Net savings as a percentage of income, 0 without income.
    pub savings_rate: f64,
    /// Expenses per category, in ascending id order.
    pub expense_breakdown: Vec<CategoryExpense>,
    /// Range the totals cover.
    pub period: PeriodSummary,
}

impl DashboardSummary {
    /// Derive net savings and savings rate from the totals.
    pub fn from_totals(
        total_income: f64,
        total_expenses: f64,
        expense_breakdown: Vec<CategoryExpense>,
        range: &DateRange,
    ) -> Self {
        Self {
            total_income,
            total_expenses,
            net_savings: total_income - total_expenses,
            savings_rate: savings_rate(total_income, total_expenses),
            expense_breakdown,
            period: range.into(),
        }
    }

    /// Amount spent in `category`, if it appears in the breakdown.
    pub fn expense_for(&self, category: CategoryId) -> Option<f64> {
        self.expense_breakdown
            .iter()
            .find(|entry| entry.id == category)
            .map(|entry| entry.amount)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Net savings as a percentage of income; 0 when income is not positive.
pub fn savings_rate(income: f64, expense: f64) -> f64 {
    if income > 0.0 {
        (income - expense) / income * 100.0
    } else {
        0.0
    }
}

fn category_name(names: &BTreeMap<CategoryId, String>, id: CategoryId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("Category {id}"))
}

/// Turns date ranges into month buckets and aligned series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodAggregator {
    default_months: u32,
}

impl Default for PeriodAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MONTHS)
    }
}

impl PeriodAggregator {
    /// Aggregator whose default range reaches `default_months` back.
    pub const fn new(default_months: u32) -> Self {
        Self { default_months }
    }

    /// Aggregator configured from the data section.
    pub const fn from_config(config: &DataConfig) -> Self {
        Self::new(config.default_months)
    }

    /// Look-back used by [`Self::default_range`].
    pub const fn default_months(&self) -> u32 {
        self.default_months
    }

    /// `[day 1 of the month N months before today, today]`.
    pub fn default_range(&self, today: NaiveDate) -> DateRange {
        DateRange::default_for(today, self.default_months)
    }

    /// Validate the requested bounds, or default when either is missing.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<DateRange> {
        match (start, end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => {
                debug!(?start, ?end, "Incomplete range, using default");
                Ok(self.default_range(today))
            }
        }
    }

    /// Month buckets of the range, chronological.
    pub fn month_buckets(&self, range: &DateRange) -> Vec<MonthBucket> {
        range.months().collect()
    }

    /// One fetch per bucket, in order; the first error aborts.
    #[instrument(skip(self, buckets, fetcher), fields(buckets = buckets.len()))]
    pub fn aggregate_scalar<F>(
        &self,
        user: UserId,
        buckets: &[MonthBucket],
        mut fetcher: F,
    ) -> Result<Vec<f64>>
    where
        F: FnMut(UserId, NaiveDate, NaiveDate) -> Result<f64>,
    {
        buckets
            .iter()
            .map(|bucket| {
                let value = fetcher(user, bucket.first_day, bucket.last_day)?;
                debug!(month = %bucket.label, value, "Fetched bucket total");
                Ok(value)
            })
            .collect()
    }

    /// Per-category values for every bucket, zero where nothing was spent.
    ///
    /// Categories returned by the fetcher outside `category_ids` are ignored.
    #[instrument(
        skip(self, buckets, category_ids, fetcher),
        fields(buckets = buckets.len(), categories = category_ids.len())
    )]
    pub fn aggregate_by_category<F>(
        &self,
        user: UserId,
        buckets: &[MonthBucket],
        category_ids: &[CategoryId],
        mut fetcher: F,
    ) -> Result<CategorySeries>
    where
        F: FnMut(UserId, NaiveDate, NaiveDate) -> Result<HashMap<CategoryId, f64>>,
    {
        let mut series = CategorySeries::zeroed(category_ids, buckets.len());
        for (index, bucket) in buckets.iter().enumerate() {
            let totals = fetcher(user, bucket.first_day, bucket.last_day)?;
            debug!(month = %bucket.label, categories = totals.len(), "Fetched category totals");
            for (category, amount) in totals {
                series.set(category, index, amount);
            }
        }
        Ok(series)
    }

    /// Running total of `values`.
    pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
        period::cumulative_sum(values)
    }

    /// Single un-bucketed fetch of the range's totals.
    #[instrument(skip(self, source), fields(start = %range.start(), end = %range.end()))]
    pub fn summary<S>(&self, source: &S, user: UserId, range: &DateRange) -> Result<DashboardSummary>
    where
        S: BudgetDataSource + ?Sized,
    {
        let income = source.total_income(user, range.start(), range.end())?;
        let expense = source.total_expense(user, range.start(), range.end())?;
        let by_category = source.expenses_by_category(user, range.start(), range.end())?;
        let ids: Vec<CategoryId> = by_category.keys().copied().collect();
        let names = source.list_categories(Some(ids.as_slice()))?;

        let mut breakdown: Vec<CategoryExpense> = by_category
            .iter()
            .map(|(id, amount)| CategoryExpense {
                id: *id,
                name: category_name(&names, *id),
                amount: *amount,
            })
            .collect();
        breakdown.sort_by_key(|entry| entry.id);

        Ok(DashboardSummary::from_totals(income, expense, breakdown, range))
    }

    /// Monthly income, expense and net.
    #[instrument(skip(self, source), fields(start = %range.start(), end = %range.end()))]
    pub fn cash_flow<S>(&self, source: &S, user: UserId, range: &DateRange) -> Result<CashFlowSeries>
    where
        S: BudgetDataSource + ?Sized,
    {
        let buckets = self.month_buckets(range);
        let income = self.aggregate_scalar(user, &buckets, |u, from, to| {
            source.total_income(u, from, to)
        })?;
        let expense = self.aggregate_scalar(user, &buckets, |u, from, to| {
            source.total_expense(u, from, to)
        })?;
        Ok(CashFlowSeries::new(labels(&buckets), income, expense))
    }

    /// Monthly savings with their running total.
    pub fn savings<S>(&self, source: &S, user: UserId, range: &DateRange) -> Result<SavingsSeries>
    where
        S: BudgetDataSource + ?Sized,
    {
        let flow = self.cash_flow(source, user, range)?;
        Ok(SavingsSeries::new(flow.labels, flow.net))
    }

    /// Monthly spending for `categories`, or for every known category.
    #[instrument(skip(self, source), fields(start = %range.start(), end = %range.end()))]
    pub fn spending_trends<S>(
        &self,
        source: &S,
        user: UserId,
        range: &DateRange,
        categories: Option<&[CategoryId]>,
    ) -> Result<SpendingTrends>
    where
        S: BudgetDataSource + ?Sized,
    {
        let names = source.list_categories(categories)?;
        let ids: Vec<CategoryId> = names.keys().copied().collect();
        let buckets = self.month_buckets(range);
        let series = self.aggregate_by_category(user, &buckets, &ids, |u, from, to| {
            source.expenses_by_category(u, from, to)
        })?;

        Ok(SpendingTrends {
            labels: labels(&buckets),
            names,
            series,
        })
    }

    /// Positive category totals over the whole range.
    ///
    /// Returns `NoData` when no category has positive spending.
    #[instrument(skip(self, source), fields(start = %range.start(), end = %range.end()))]
    pub fn category_distribution<S>(
        &self,
        source: &S,
        user: UserId,
        range: &DateRange,
    ) -> Result<CategoryDistribution>
    where
        S: BudgetDataSource + ?Sized,
    {
        let totals = source.expenses_by_category(user, range.start(), range.end())?;
        let ids: Vec<CategoryId> = totals.keys().copied().collect();
        let names = source.list_categories(Some(ids.as_slice()))?;

        let distribution = CategoryDistribution::from_totals(&totals, &names);
        if distribution.is_empty() {
            return Err(FinGraphError::no_data(NO_EXPENSE_DATA));
        }
        Ok(distribution)
    }
}

fn labels(buckets: &[MonthBucket]) -> Vec<String> {
    buckets.iter().map(|bucket| bucket.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryBudgetSource;
    use chrono::Datelike;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    fn budget() -> MemoryBudgetSource {
        MemoryBudgetSource::new()
            .with_category(CategoryId(1), "Groceries")
            .with_category(CategoryId(2), "Rent")
            .with_category(CategoryId(3), "Travel")
            .with_income(UserId(7), ymd(2024, 1, 3), 3000.0)
            .with_income(UserId(7), ymd(2024, 2, 3), 3000.0)
            .with_expense(UserId(7), ymd(2024, 1, 10), CategoryId(1), 400.0)
            .with_expense(UserId(7), ymd(2024, 1, 1), CategoryId(2), 1500.0)
            .with_expense(UserId(7), ymd(2024, 2, 1), CategoryId(2), 1500.0)
            .with_expense(UserId(7), ymd(2024, 3, 20), CategoryId(1), 250.0)
    }

    #[test]
    fn test_resolve_range() {
        let aggregator = PeriodAggregator::default();
        let today = ymd(2024, 3, 15);

        let explicit = aggregator
            .resolve_range(Some(ymd(2024, 1, 1)), Some(ymd(2024, 2, 1)), today)
            .unwrap();
        assert_eq!(explicit.start(), ymd(2024, 1, 1));

        let half = aggregator.resolve_range(Some(ymd(2024, 1, 1)), None, today).unwrap();
        assert_eq!(half, aggregator.default_range(today));
        assert_eq!(half.start(), ymd(2023, 9, 1));

        let inverted = aggregator.resolve_range(Some(ymd(2024, 3, 1)), Some(ymd(2024, 1, 1)), today);
        assert!(matches!(inverted, Err(FinGraphError::InvalidRange { .. })));
    }

    #[test]
    fn test_configured_look_back() {
        let aggregator = PeriodAggregator::new(1);
        let range = aggregator.default_range(ymd(2024, 1, 20));
        assert_eq!(range.start(), ymd(2023, 12, 1));
        assert_eq!(aggregator.month_buckets(&range).len(), 2);
    }

    #[test]
    fn test_aggregate_scalar_in_bucket_order() {
        let aggregator = PeriodAggregator::default();
        let buckets = aggregator.month_buckets(&range(ymd(2024, 1, 1), ymd(2024, 3, 31)));

        let mut seen = Vec::new();
        let values = aggregator
            .aggregate_scalar(UserId(1), &buckets, |_, from, to| {
                seen.push((from, to));
                Ok(f64::from(to.day()))
            })
            .unwrap();

        assert_eq!(values, vec![31.0, 29.0, 31.0]);
        assert_eq!(seen[1], (ymd(2024, 2, 1), ymd(2024, 2, 29)));
    }

    #[test]
    fn test_aggregate_scalar_stops_on_error() {
        let aggregator = PeriodAggregator::default();
        let buckets = aggregator.month_buckets(&range(ymd(2024, 1, 1), ymd(2024, 4, 30)));

        let mut calls = 0;
        let result = aggregator.aggregate_scalar(UserId(1), &buckets, |_, from, _| {
            calls += 1;
            if from.month() == 2 {
                Err(FinGraphError::data_source("ledger offline"))
            } else {
                Ok(1.0)
            }
        });

        assert!(matches!(result, Err(FinGraphError::DataSource { .. })));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_aggregate_by_category_fills_zeros() {
        let aggregator = PeriodAggregator::default();
        let buckets = aggregator.month_buckets(&range(ymd(2024, 1, 1), ymd(2024, 3, 31)));
        let ids = [CategoryId(1), CategoryId(2)];

        let series = aggregator
            .aggregate_by_category(UserId(1), &buckets, &ids, |_, from, _| {
                let mut totals = HashMap::new();
                if from.month() == 2 {
                    totals.insert(CategoryId(2), 80.0);
                    totals.insert(CategoryId(99), 5.0);
                }
                Ok(totals)
            })
            .unwrap();

        assert_eq!(series.category_count(), 2);
        assert_eq!(series.bucket_count(), 3);
        assert_eq!(series.get(CategoryId(1)), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(series.get(CategoryId(2)), Some(&[0.0, 80.0, 0.0][..]));
        assert!(series.get(CategoryId(99)).is_none());
    }

    #[test]
    fn test_summary_totals_and_rate() {
        let aggregator = PeriodAggregator::default();
        let summary = aggregator
            .summary(&budget(), UserId(7), &range(ymd(2024, 1, 1), ymd(2024, 2, 29)))
            .unwrap();

        assert!((summary.total_income - 6000.0).abs() < 1e-9);
        assert!((summary.total_expenses - 3400.0).abs() < 1e-9);
        assert!((summary.net_savings - 2600.0).abs() < 1e-9);
        assert!((summary.savings_rate - 2600.0 / 6000.0 * 100.0).abs() < 1e-9);
        assert_eq!(summary.expense_breakdown.len(), 2);
        assert_eq!(summary.expense_for(CategoryId(2)), Some(3000.0));
    }

    #[test]
    fn test_summary_keeps_categories_sharing_a_name() {
        let source = MemoryBudgetSource::new()
            .with_category(CategoryId(1), "Food")
            .with_category(CategoryId(2), "Food")
            .with_expense(UserId(7), ymd(2024, 1, 3), CategoryId(1), 100.0)
            .with_expense(UserId(7), ymd(2024, 1, 9), CategoryId(2), 250.0)
            .with_expense(UserId(7), ymd(2024, 1, 12), CategoryId(5), 40.0);

        let summary = PeriodAggregator::default()
            .summary(&source, UserId(7), &range(ymd(2024, 1, 1), ymd(2024, 1, 31)))
            .unwrap();

        let ids: Vec<CategoryId> = summary.expense_breakdown.iter().map(|e| e.id).collect();
        assert_eq!(ids, [CategoryId(1), CategoryId(2), CategoryId(5)]);
        assert_eq!(summary.expense_breakdown[2].name, "Category 5");
        let sum: f64 = summary.expense_breakdown.iter().map(|e| e.amount).sum();
        assert!((sum - summary.total_expenses).abs() < 1e-9);
    }

    #[test]
    fn test_summary_json_uses_iso_dates() {
        let aggregator = PeriodAggregator::default();
        let summary = aggregator
            .summary(&budget(), UserId(7), &range(ymd(2024, 1, 1), ymd(2024, 3, 15)))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();

        assert_eq!(json["period"]["start"], "2024-01-01");
        assert_eq!(json["period"]["end"], "2024-03-15");
        assert_eq!(json["expense_breakdown"][0]["name"], "Groceries");
        assert!(json["expense_breakdown"][0]["amount"].is_number());
    }

    #[test]
    fn test_savings_rate_without_income() {
        assert!(savings_rate(0.0, 0.0).abs() < f64::EPSILON);
        assert!(savings_rate(0.0, 500.0).abs() < f64::EPSILON);
        assert!(savings_rate(-10.0, 500.0).abs() < f64::EPSILON);
        assert!((savings_rate(200.0, 150.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_cash_flow_and_savings() {
        let aggregator = PeriodAggregator::default();
        let period = range(ymd(2024, 1, 1), ymd(2024, 3, 31));

        let flow = aggregator.cash_flow(&budget(), UserId(7), &period).unwrap();
        assert_eq!(flow.labels, ["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert_eq!(flow.income, vec![3000.0, 3000.0, 0.0]);
        assert_eq!(flow.expense, vec![1900.0, 1500.0, 250.0]);
        assert_eq!(flow.net, vec![1100.0, 1500.0, -250.0]);
        assert_eq!(flow.net_points()[2].bucket_index, 2);

        let savings = aggregator.savings(&budget(), UserId(7), &period).unwrap();
        assert_eq!(savings.cumulative, vec![1100.0, 2600.0, 2350.0]);
    }

    #[test]
    fn test_spending_trends_keep_zero_months() {
        let aggregator = PeriodAggregator::default();
        let period = range(ymd(2024, 1, 1), ymd(2024, 3, 31));

        let trends = aggregator
            .spending_trends(&budget(), UserId(7), &period, None)
            .unwrap();
        assert_eq!(trends.names.len(), 3);
        assert_eq!(trends.series.get(CategoryId(3)), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(trends.series.get(CategoryId(1)), Some(&[400.0, 0.0, 250.0][..]));

        let only_rent = aggregator
            .spending_trends(&budget(), UserId(7), &period, Some(&[CategoryId(2)][..]))
            .unwrap();
        assert_eq!(only_rent.series.category_count(), 1);
        assert_eq!(only_rent.series.totals()[&CategoryId(2)], 3000.0);
    }

    #[test]
    fn test_category_distribution_order_and_share() {
        let aggregator = PeriodAggregator::default();
        let distribution = aggregator
            .category_distribution(&budget(), UserId(7), &range(ymd(2024, 1, 1), ymd(2024, 3, 31)))
            .unwrap();

        let names: Vec<&str> = distribution.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Rent", "Groceries"]);
        assert!((distribution.total - 3650.0).abs() < 1e-9);
        let share: f64 = distribution.slices.iter().map(|s| s.percentage).sum();
        assert!((share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_filters_non_positive() {
        let mut totals = HashMap::new();
        totals.insert(CategoryId(1), 0.0);
        totals.insert(CategoryId(2), -20.0);
        totals.insert(CategoryId(3), 30.0);
        totals.insert(CategoryId(4), 30.0);

        let distribution = CategoryDistribution::from_totals(&totals, &BTreeMap::new());
        let ids: Vec<CategoryId> = distribution.slices.iter().map(|s| s.id).collect();
        assert_eq!(ids, [CategoryId(3), CategoryId(4)]);
        assert_eq!(distribution.slices[0].name, "Category 3");
        assert!((distribution.slices[1].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_distribution_is_no_data() {
        let aggregator = PeriodAggregator::default();
        let err = aggregator
            .category_distribution(&budget(), UserId(7), &range(ymd(2020, 1, 1), ymd(2020, 12, 31)))
            .unwrap_err();
        assert!(err.is_no_data());
        assert!(err.to_string().contains(NO_EXPENSE_DATA));
    }
}
