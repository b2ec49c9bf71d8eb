//! Per-member expense aggregation across one or more groups.
//!
//! Every operation is a fresh read: it resolves each requested group through
//! the [`GroupDirectory`], loads its table from the [`TransactionStore`], keeps
//! the rows the member takes part in and folds their shares into the result.
//! A group that cannot be resolved or read, or that has no column for the
//! member, contributes nothing. Only invalid input to the call is an error.
use crate::core::directory::{Group, GroupDirectory};
use crate::core::ledger::{TransactionRow, TransactionStore};
use crate::core::period::{DateRange, YearMonth};
use crate::core::share::{ShareKind, classify};
use crate::store::caching::CachingTransactionStore;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info};

/// A row the member took part in, tagged with the group it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDetail {
    pub group_id: String,
    pub group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_emoji: Option<String>,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub total_cost: f64,
    pub member_share: f64,
    pub is_debt: bool,
}

impl TransactionDetail {
    /// Group name prefixed with the group's emoji, if it has one.
    pub fn group_label(&self) -> String {
        match &self.group_emoji {
            Some(emoji) => format!("{emoji} {}", self.group_name),
            None => self.group_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum GroupOutcome {
    Included,
    UnknownGroup,
    NoDataLocation,
    LoadFailed(String),
    MemberNotFound,
    NoTransactions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatus {
    pub group_id: String,
    #[serde(flatten)]
    pub outcome: GroupOutcome,
}

/// Totals for one member over the analyzed groups.
///
/// `net_balance` is `total_paid - total_owed_by_them`: positive means the
/// member is owed money overall, negative means they owe money.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub member_name: String,
    pub total_expense: f64,
    pub total_paid: f64,
    pub total_owed_by_them: f64,
    pub net_balance: f64,
    pub transactions: Vec<TransactionDetail>,
    pub transaction_count: usize,
    pub groups_analyzed: usize,
    pub group_statuses: Vec<GroupStatus>,
}

impl ExpenseSummary {
    /// Number of groups whose data actually contributed to the totals.
    pub fn groups_included(&self) -> usize {
        self.group_statuses
            .iter()
            .filter(|s| s.outcome == GroupOutcome::Included)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExpense {
    pub year_month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregatorOptions {
    /// Fail instead of returning zeros when no loaded group knows the member.
    pub strict_member_lookup: bool,
}

pub struct ExpenseAggregator<'a> {
    directory: &'a dyn GroupDirectory,
    store: &'a dyn TransactionStore,
    options: AggregatorOptions,
}

impl<'a> ExpenseAggregator<'a> {
    pub fn new(directory: &'a dyn GroupDirectory, store: &'a dyn TransactionStore) -> Self {
        Self {
            directory,
            store,
            options: AggregatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AggregatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn total_expense(
        &self,
        group_ids: &[String],
        member_name: &str,
        date_range: Option<&DateRange>,
    ) -> Result<ExpenseSummary> {
        let summary = self.summarize(group_ids, member_name, date_range);
        self.check_member_known(member_name, &summary.group_statuses)?;
        info!(
            member = member_name,
            groups = summary.groups_analyzed,
            included = summary.groups_included(),
            transactions = summary.transaction_count,
            "Computed expense summary"
        );
        Ok(summary)
    }

    /// Union of the member lists of the given groups.
    pub fn members(&self, group_ids: &[String]) -> BTreeSet<String> {
        self.directory.list_members(group_ids)
    }

    pub fn all_members_expenses(
        &self,
        group_ids: &[String],
        date_range: Option<&DateRange>,
    ) -> Result<BTreeMap<String, ExpenseSummary>> {
        self.all_members_expenses_with_progress(group_ids, date_range, &|| ())
    }

    /// Same as [`Self::all_members_expenses`], calling `update_callback` after
    /// each member is summarized.
    ///
    /// Members come from the directory rather than the caller, so strict
    /// member lookup does not apply here. Tables are read once for the whole
    /// batch.
    pub fn all_members_expenses_with_progress(
        &self,
        group_ids: &[String],
        date_range: Option<&DateRange>,
        update_callback: &dyn Fn(),
    ) -> Result<BTreeMap<String, ExpenseSummary>> {
        let members = self.members(group_ids);
        debug!("Summarizing {} members", members.len());

        let cached = CachingTransactionStore::new(self.store);
        let batch = ExpenseAggregator::new(self.directory, &cached);

        let mut results = BTreeMap::new();
        for member in members {
            let summary = batch.summarize(group_ids, &member, date_range);
            results.insert(member, summary);
            update_callback();
        }
        Ok(results)
    }

    /// Positive shares keyed by the row's category, compared verbatim.
    pub fn expense_by_category(
        &self,
        group_ids: &[String],
        member_name: &str,
        date_range: Option<&DateRange>,
    ) -> Result<BTreeMap<String, f64>> {
        let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
        let statuses = self.collect(group_ids, member_name, date_range, |_, row, share| {
            if let Some(amount) = share.paid() {
                *breakdown.entry(row.category.clone()).or_default() += amount;
            }
        });
        self.check_member_known(member_name, &statuses)?;
        Ok(breakdown)
    }

    /// Total expense per group display name. Unresolvable groups are absent.
    pub fn expense_by_group(
        &self,
        group_ids: &[String],
        member_name: &str,
        date_range: Option<&DateRange>,
    ) -> Result<BTreeMap<String, f64>> {
        let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
        let mut statuses = Vec::new();
        for group_id in distinct(group_ids) {
            let Some(group) = self.directory.resolve(&group_id) else {
                debug!(group_id = %group_id, "Skipping unknown group in group breakdown");
                statuses.push(GroupStatus {
                    group_id,
                    outcome: GroupOutcome::UnknownGroup,
                });
                continue;
            };
            let summary = self.summarize(&[group_id], member_name, date_range);
            *breakdown.entry(group.name).or_default() += summary.total_expense;
            statuses.extend(summary.group_statuses);
        }
        self.check_member_known(member_name, &statuses)?;
        Ok(breakdown)
    }

    /// Positive shares bucketed by calendar month, oldest first.
    pub fn monthly_expenses(
        &self,
        group_ids: &[String],
        member_name: &str,
        date_range: Option<&DateRange>,
    ) -> Result<Vec<MonthlyExpense>> {
        let mut buckets: BTreeMap<YearMonth, f64> = BTreeMap::new();
        let statuses = self.collect(group_ids, member_name, date_range, |_, row, share| {
            if let Some(amount) = share.paid() {
                *buckets.entry(YearMonth::from(row.date)).or_default() += amount;
            }
        });
        self.check_member_known(member_name, &statuses)?;

        Ok(buckets
            .into_iter()
            .map(|(month, amount)| MonthlyExpense {
                year_month: month.to_string(),
                amount,
            })
            .collect())
    }

    fn summarize(
        &self,
        group_ids: &[String],
        member_name: &str,
        date_range: Option<&DateRange>,
    ) -> ExpenseSummary {
        let mut total_paid = 0.0;
        let mut total_owed = 0.0;
        let mut transactions = Vec::new();

        let statuses = self.collect(group_ids, member_name, date_range, |group, row, share| {
            match share {
                ShareKind::Paid(amount) => total_paid += amount,
                ShareKind::Owed(amount) => total_owed += amount,
                ShareKind::Uninvolved => {}
            }
            transactions.push(TransactionDetail {
                group_id: group.id.clone(),
                group_name: group.name.clone(),
                group_emoji: group.emoji.clone(),
                date: row.date,
                description: row.description.clone(),
                category: row.category.clone(),
                total_cost: row.total_cost,
                member_share: row.share_of(member_name),
                is_debt: share.is_debt(),
            });
        });

        ExpenseSummary {
            member_name: member_name.to_string(),
            total_expense: total_paid,
            total_paid,
            total_owed_by_them: total_owed,
            net_balance: total_paid - total_owed,
            transaction_count: transactions.len(),
            transactions,
            groups_analyzed: statuses.len(),
            group_statuses: statuses,
        }
    }

    /// Walks every participating row of `member_name` in the requested groups.
    fn collect<F>(
        &self,
        group_ids: &[String],
        member_name: &str,
        date_range: Option<&DateRange>,
        mut visit: F,
    ) -> Vec<GroupStatus>
    where
        F: FnMut(&Group, &TransactionRow, ShareKind),
    {
        distinct(group_ids)
            .into_iter()
            .map(|group_id| {
                let outcome = self.collect_group(&group_id, member_name, date_range, &mut visit);
                if outcome != GroupOutcome::Included {
                    debug!(group_id = %group_id, ?outcome, member = member_name, "Group skipped");
                }
                GroupStatus { group_id, outcome }
            })
            .collect()
    }

    fn collect_group<F>(
        &self,
        group_id: &str,
        member_name: &str,
        date_range: Option<&DateRange>,
        visit: &mut F,
    ) -> GroupOutcome
    where
        F: FnMut(&Group, &TransactionRow, ShareKind),
    {
        let Some(group) = self.directory.resolve(group_id) else {
            return GroupOutcome::UnknownGroup;
        };
        let Some(location) = self.directory.data_location(group_id) else {
            return GroupOutcome::NoDataLocation;
        };
        let table = match self.store.load(&location) {
            Ok(table) => table,
            Err(e) => return GroupOutcome::LoadFailed(format!("{e:#}")),
        };
        if !self.store.has_member_column(&table, member_name) {
            return GroupOutcome::MemberNotFound;
        }
        if table.is_empty() {
            return GroupOutcome::NoTransactions;
        }

        for row in self.store.rows_for_member(&table, member_name) {
            if date_range.is_some_and(|range| !range.contains(row.date)) {
                continue;
            }
            visit(&group, row, classify(row.share_of(member_name)));
        }
        GroupOutcome::Included
    }

    fn check_member_known(&self, member_name: &str, statuses: &[GroupStatus]) -> Result<()> {
        if !self.options.strict_member_lookup {
            return Ok(());
        }
        let missing = statuses
            .iter()
            .any(|s| s.outcome == GroupOutcome::MemberNotFound);
        let known = statuses.iter().any(|s| {
            matches!(
                s.outcome,
                GroupOutcome::Included | GroupOutcome::NoTransactions
            )
        });
        if missing && !known {
            bail!("Member '{member_name}' not found in any of the requested groups");
        }
        Ok(())
    }
}

/// Categories ordered by amount, largest first; ties by name.
pub fn top_categories(breakdown: &BTreeMap<String, f64>, n: usize) -> Vec<(String, f64)> {
    let mut sorted: Vec<(String, f64)> = breakdown
        .iter()
        .map(|(category, amount)| (category.clone(), *amount))
        .collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

fn distinct(group_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    group_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
