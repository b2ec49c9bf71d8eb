//! Transaction table types and the store abstraction that loads them

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One shared expense with every member's signed share of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub total_cost: f64,
    pub currency: Option<String>,
    pub shares: HashMap<String, f64>,
}

impl TransactionRow {
    /// Signed share of `member`; zero when the member has no entry.
    pub fn share_of(&self, member: &str) -> f64 {
        self.shares.get(member).copied().unwrap_or(0.0)
    }
}

/// A group's transactions along with the member columns they were read with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionTable {
    pub members: Vec<String>,
    pub rows: Vec<TransactionRow>,
}

impl TransactionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    pub fn rows_for_member(&self, member: &str) -> Vec<&TransactionRow> {
        self.rows
            .iter()
            .filter(|row| row.share_of(member) != 0.0)
            .collect()
    }
}

pub trait TransactionStore: Send + Sync {
    fn load(&self, location: &Path) -> Result<TransactionTable>;

    fn has_member_column(&self, table: &TransactionTable, member: &str) -> bool {
        table.has_member(member)
    }

    fn rows_for_member<'t>(
        &self,
        table: &'t TransactionTable,
        member: &str,
    ) -> Vec<&'t TransactionRow> {
        table.rows_for_member(member)
    }
}

impl<T: TransactionStore + ?Sized> TransactionStore for &T {
    fn load(&self, location: &Path) -> Result<TransactionTable> {
        (**self).load(location)
    }

    fn has_member_column(&self, table: &TransactionTable, member: &str) -> bool {
        (**self).has_member_column(table, member)
    }

    fn rows_for_member<'t>(
        &self,
        table: &'t TransactionTable,
        member: &str,
    ) -> Vec<&'t TransactionRow> {
        (**self).rows_for_member(table, member)
    }
}
