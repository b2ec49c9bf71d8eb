use super::ui;
use crate::core::aggregator::{ExpenseAggregator, ExpenseSummary, GroupOutcome};
use crate::core::period::DateRange;
use anyhow::Result;
use comfy_table::Cell;

impl ExpenseSummary {
    pub fn display_as_table(&self, currency: &str) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Group"),
            ui::header_cell("Description"),
            ui::header_cell("Category"),
            ui::header_cell("Cost"),
            ui::header_cell("Share"),
        ]);

        for txn in &self.transactions {
            table.add_row(vec![
                Cell::new(txn.date.to_string()),
                Cell::new(txn.group_label()),
                Cell::new(&txn.description),
                Cell::new(&txn.category),
                ui::amount_cell(txn.total_cost, currency),
                ui::balance_cell(txn.member_share, currency),
            ]);
        }

        let mut output = format!(
            "Member: {}\n\n",
            ui::style_text(&self.member_name, ui::StyleType::Title)
        );

        if self.transactions.is_empty() {
            output.push_str(&ui::style_text(
                "No transactions found.",
                ui::StyleType::Subtle,
            ));
        } else {
            output.push_str(&table.to_string());
        }

        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total Expense", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_amount(self.total_expense, currency),
                ui::StyleType::TotalValue
            )
        ));
        output.push_str(&format!(
            "\n{}: {}",
            ui::style_text("Owed By Them", ui::StyleType::TotalLabel),
            ui::format_amount(self.total_owed_by_them, currency)
        ));
        let balance_style = if self.net_balance >= 0.0 {
            ui::StyleType::TotalValue
        } else {
            ui::StyleType::Error
        };
        output.push_str(&format!(
            "\n{}: {}",
            ui::style_text("Net Balance", ui::StyleType::TotalLabel),
            ui::style_text(&ui::format_amount(self.net_balance, currency), balance_style)
        ));
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!(
                    "{} transactions from {} of {} groups",
                    self.transaction_count,
                    self.groups_included(),
                    self.groups_analyzed
                ),
                ui::StyleType::Subtle
            )
        ));

        for status in &self.group_statuses {
            let reason = match &status.outcome {
                GroupOutcome::Included => continue,
                GroupOutcome::UnknownGroup => "unknown group".to_string(),
                GroupOutcome::NoDataLocation => "no transaction file configured".to_string(),
                GroupOutcome::LoadFailed(e) => format!("could not read transactions: {e}"),
                GroupOutcome::MemberNotFound => "member not in this group".to_string(),
                GroupOutcome::NoTransactions => "no transactions".to_string(),
            };
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("Skipped {}: {reason}", status.group_id),
                    ui::StyleType::Subtle
                )
            ));
        }

        output
    }
}

pub fn run(
    aggregator: &ExpenseAggregator,
    group_ids: &[String],
    member: &str,
    date_range: Option<&DateRange>,
    json: bool,
    currency: &str,
) -> Result<()> {
    let summary = aggregator.total_expense(group_ids, member, date_range)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.display_as_table(currency));
    }
    Ok(())
}
