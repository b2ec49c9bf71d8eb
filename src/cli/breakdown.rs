use super::ui;
use crate::core::aggregator::{ExpenseAggregator, MonthlyExpense, top_categories};
use crate::core::period::DateRange;
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeMap;

/// Renders a key/amount breakdown with a share-of-total column.
fn display_breakdown(
    title: &str,
    key_header: &str,
    rows: &[(String, f64)],
    currency: &str,
) -> String {
    let total: f64 = rows.iter().map(|(_, amount)| amount).sum();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(key_header),
        ui::header_cell("Amount"),
        ui::header_cell("Share (%)"),
    ]);
    for (key, amount) in rows {
        let share = if total > 0.0 {
            format!("{:.2}%", amount / total * 100.0)
        } else {
            "N/A".to_string()
        };
        table.add_row(vec![
            Cell::new(key),
            ui::amount_cell(*amount, currency),
            Cell::new(share),
        ]);
    }

    let mut output = format!("{}\n\n", ui::style_text(title, ui::StyleType::Title));
    if rows.is_empty() {
        output.push_str(&ui::style_text("No expenses found.", ui::StyleType::Subtle));
        return output;
    }
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{}: {}",
        ui::style_text("Total", ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_amount(total, currency), ui::StyleType::TotalValue)
    ));
    output
}

fn print_json_or_table<T: serde::Serialize>(
    value: &T,
    json: bool,
    table: impl FnOnce() -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", table());
    }
    Ok(())
}

pub fn run_categories(
    aggregator: &ExpenseAggregator,
    group_ids: &[String],
    member: &str,
    date_range: Option<&DateRange>,
    json: bool,
    currency: &str,
) -> Result<()> {
    let categories = aggregator.expense_by_category(group_ids, member, date_range)?;
    print_json_or_table(&categories, json, || {
        let sorted = top_categories(&categories, categories.len());
        display_breakdown(
            &format!("Expenses by category: {member}"),
            "Category",
            &sorted,
            currency,
        )
    })
}

pub fn run_by_group(
    aggregator: &ExpenseAggregator,
    group_ids: &[String],
    member: &str,
    date_range: Option<&DateRange>,
    json: bool,
    currency: &str,
) -> Result<()> {
    let groups: BTreeMap<String, f64> =
        aggregator.expense_by_group(group_ids, member, date_range)?;
    print_json_or_table(&groups, json, || {
        let rows: Vec<(String, f64)> = groups.clone().into_iter().collect();
        display_breakdown(
            &format!("Expenses by group: {member}"),
            "Group",
            &rows,
            currency,
        )
    })
}

pub fn run_monthly(
    aggregator: &ExpenseAggregator,
    group_ids: &[String],
    member: &str,
    date_range: Option<&DateRange>,
    json: bool,
    currency: &str,
) -> Result<()> {
    let monthly: Vec<MonthlyExpense> =
        aggregator.monthly_expenses(group_ids, member, date_range)?;
    print_json_or_table(&monthly, json, || {
        let rows: Vec<(String, f64)> = monthly
            .iter()
            .map(|m| (m.year_month.clone(), m.amount))
            .collect();
        display_breakdown(
            &format!("Monthly expenses: {member}"),
            "Month",
            &rows,
            currency,
        )
    })
}
