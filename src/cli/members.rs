use super::ui;
use crate::core::aggregator::{ExpenseAggregator, ExpenseSummary};
use crate::core::period::DateRange;
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeMap;

fn display_members(summaries: &BTreeMap<String, ExpenseSummary>, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Member"),
        ui::header_cell("Paid"),
        ui::header_cell("Owes"),
        ui::header_cell("Net Balance"),
        ui::header_cell("Transactions"),
    ]);

    for (member, summary) in summaries {
        table.add_row(vec![
            Cell::new(member),
            ui::amount_cell(summary.total_expense, currency),
            ui::amount_cell(summary.total_owed_by_them, currency),
            ui::balance_cell(summary.net_balance, currency),
            Cell::new(summary.transaction_count),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Member balances", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output
}

pub fn run(
    aggregator: &ExpenseAggregator,
    group_ids: &[String],
    date_range: Option<&DateRange>,
    json: bool,
    currency: &str,
) -> Result<()> {
    let pb = ui::new_progress_bar(aggregator.members(group_ids).len() as u64);
    pb.set_message("Summarizing members...");

    let summaries =
        aggregator.all_members_expenses_with_progress(group_ids, date_range, &|| pb.inc(1))?;
    pb.finish_and_clear();

    if summaries.is_empty() {
        println!("No members found in the selected groups.");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        println!("{}", display_members(&summaries, currency));
    }
    Ok(())
}
