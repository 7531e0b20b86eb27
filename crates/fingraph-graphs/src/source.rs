//! Budget data source capability and an in-memory implementation.

use chrono::NaiveDate;
use fingraph_common::{CategoryId, Result, UserId};
use std::collections::{BTreeMap, HashMap};

/// Read access to a user's budget, queried per date range.
///
/// Bounds are inclusive. Implementations own their connection handling;
/// the aggregation pipeline only borrows a source for one call.
pub trait BudgetDataSource {
    /// Total income booked between `from` and `to`.
    fn total_income(&self, user: UserId, from: NaiveDate, to: NaiveDate) -> Result<f64>;

    /// Total expenses booked between `from` and `to`.
    fn total_expense(&self, user: UserId, from: NaiveDate, to: NaiveDate) -> Result<f64>;

    /// Expenses between `from` and `to`, summed per category.
    ///
    /// Categories without activity may be absent from the map.
    fn expenses_by_category(
        &self,
        user: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<CategoryId, f64>>;

    /// Category names, restricted to `ids` when given.
    fn list_categories(&self, ids: Option<&[CategoryId]>) -> Result<BTreeMap<CategoryId, String>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Entry {
    Income,
    Expense(CategoryId),
}

#[derive(Debug, Clone, PartialEq)]
struct Transaction {
    user: UserId,
    date: NaiveDate,
    amount: f64,
    entry: Entry,
}

/// Deterministic in-memory budget, built up with the `with_*` methods.
#[derive(Debug, Clone, Default)]
pub struct MemoryBudgetSource {
    categories: BTreeMap<CategoryId, String>,
    transactions: Vec<Transaction>,
}

impl MemoryBudgetSource {
    /// Create an empty budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category name.
    #[must_use]
    pub fn with_category(mut self, id: CategoryId, name: impl Into<String>) -> Self {
        self.categories.insert(id, name.into());
        self
    }

    /// Book an income.
    #[must_use]
    pub fn with_income(mut self, user: UserId, date: NaiveDate, amount: f64) -> Self {
        self.transactions.push(Transaction {
            user,
            date,
            amount,
            entry: Entry::Income,
        });
        self
    }

    /// Book an expense against a category.
    #[must_use]
    pub fn with_expense(
        mut self,
        user: UserId,
        date: NaiveDate,
        category: CategoryId,
        amount: f64,
    ) -> Self {
        self.transactions.push(Transaction {
            user,
            date,
            amount,
            entry: Entry::Expense(category),
        });
        self
    }

    /// Number of booked transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether nothing has been booked.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn in_range(
        &self,
        user: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.user == user && from <= t.date && t.date <= to)
    }
}

impl BudgetDataSource for MemoryBudgetSource {
    fn total_income(&self, user: UserId, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        Ok(self
            .in_range(user, from, to)
            .filter(|t| t.entry == Entry::Income)
            .map(|t| t.amount)
            .sum())
    }

    fn total_expense(&self, user: UserId, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        Ok(self
            .in_range(user, from, to)
            .filter(|t| matches!(t.entry, Entry::Expense(_)))
            .map(|t| t.amount)
            .sum())
    }

    fn expenses_by_category(
        &self,
        user: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<CategoryId, f64>> {
        let mut totals = HashMap::new();
        for transaction in self.in_range(user, from, to) {
            if let Entry::Expense(category) = transaction.entry {
                *totals.entry(category).or_insert(0.0) += transaction.amount;
            }
        }
        Ok(totals)
    }

    fn list_categories(&self, ids: Option<&[CategoryId]>) -> Result<BTreeMap<CategoryId, String>> {
        Ok(match ids {
            Some(ids) => self
                .categories
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .map(|(id, name)| (*id, name.clone()))
                .collect(),
            None => self.categories.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> MemoryBudgetSource {
        MemoryBudgetSource::new()
            .with_category(CategoryId(1), "Groceries")
            .with_category(CategoryId(2), "Rent")
            .with_income(UserId(1), ymd(2024, 1, 1), 3000.0)
            .with_income(UserId(2), ymd(2024, 1, 1), 9999.0)
            .with_expense(UserId(1), ymd(2024, 1, 5), CategoryId(1), 120.0)
            .with_expense(UserId(1), ymd(2024, 1, 31), CategoryId(1), 80.0)
            .with_expense(UserId(1), ymd(2024, 2, 1), CategoryId(2), 1200.0)
    }

    #[test]
    fn test_totals_respect_user_and_bounds() {
        let source = sample();
        assert_eq!(source.len(), 5);

        let income = source
            .total_income(UserId(1), ymd(2024, 1, 1), ymd(2024, 1, 31))
            .unwrap();
        assert!((income - 3000.0).abs() < f64::EPSILON);

        let expense = source
            .total_expense(UserId(1), ymd(2024, 1, 1), ymd(2024, 1, 31))
            .unwrap();
        assert!((expense - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expenses_by_category() {
        let source = sample();
        let totals = source
            .expenses_by_category(UserId(1), ymd(2024, 1, 1), ymd(2024, 2, 29))
            .unwrap();
        assert_eq!(totals.len(), 2);
        assert!((totals[&CategoryId(1)] - 200.0).abs() < f64::EPSILON);
        assert!((totals[&CategoryId(2)] - 1200.0).abs() < f64::EPSILON);

        let empty = source
            .expenses_by_category(UserId(1), ymd(2023, 1, 1), ymd(2023, 12, 31))
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_list_categories_filter() {
        let source = sample();
        assert_eq!(source.list_categories(None).unwrap().len(), 2);

        let only_rent = source.list_categories(Some(&[CategoryId(2), CategoryId(9)][..])).unwrap();
        assert_eq!(only_rent.len(), 1);
        assert_eq!(only_rent[&CategoryId(2)], "Rent");
    }
}
