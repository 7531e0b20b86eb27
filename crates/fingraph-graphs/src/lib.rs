//! # FinGraph Graphs
//!
//! Monthly budget aggregation and financial chart rendering.
//!
//! Aggregation splits a date range into calendar months and queries a
//! [`BudgetDataSource`] once per month. Renderers turn the aligned series
//! into PNG bytes with plotters, and [`ChartManager`] ties both together
//! into a dashboard.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod export;
pub mod manager;
pub mod period;
pub mod source;
pub mod traits;
pub mod types;
pub mod utils;

// Chart renderers
pub mod category_breakdown;
pub mod income_expense;
pub mod no_data;
pub mod savings_trend;
pub mod spending_trends;

pub use aggregator::*;
pub use category_breakdown::CategoryBreakdownGraph;
pub use export::*;
pub use income_expense::IncomeExpenseGraph;
pub use manager::*;
pub use no_data::NoDataGraph;
pub use period::*;
pub use savings_trend::SavingsTrendGraph;
pub use source::*;
pub use spending_trends::SpendingTrendsGraph;
pub use traits::*;
pub use types::*;
pub use utils::*;
