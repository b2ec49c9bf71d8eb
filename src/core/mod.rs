//! Core business logic abstractions

pub mod aggregator;
pub mod config;
pub mod directory;
pub mod ledger;
pub mod log;
pub mod period;
pub mod share;

// Re-export main types for cleaner imports
pub use aggregator::{AggregatorOptions, ExpenseAggregator, ExpenseSummary, MonthlyExpense};
pub use directory::{Group, GroupDirectory};
pub use ledger::{TransactionRow, TransactionStore, TransactionTable};
pub use period::{DateRange, YearMonth};
