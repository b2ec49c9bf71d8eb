//! Reader for Splitwise-style CSV exports.
//!
//! The header starts with the fixed columns `Date`, `Description`,
//! `Category`, `Cost` and optionally `Currency`; every other column holds one
//! member's signed share. Exports end with a "Total balance" row that has no
//! date, which is skipped along with blank lines.
use crate::core::ledger::{TransactionRow, TransactionStore, TransactionTable};
use crate::core::period::parse_date;
use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

const DATE: &str = "Date";
const DESCRIPTION: &str = "Description";
const CATEGORY: &str = "Category";
const COST: &str = "Cost";
const CURRENCY: &str = "Currency";

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvTransactionStore;

impl CsvTransactionStore {
    pub fn new() -> Self {
        Self
    }

    pub fn read_table<R: Read>(&self, reader: R) -> Result<TransactionTable> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = Layout::from_headers(&headers)?;

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let date = record.get(layout.date).unwrap_or("");
            if date.is_empty() {
                continue;
            }
            let row = layout
                .parse_row(&record)
                .with_context(|| format!("Invalid transaction on line {line}"))?;
            rows.push(row);
        }

        debug!(
            "Read {} transactions for members {:?}",
            rows.len(),
            layout.member_names()
        );
        Ok(TransactionTable {
            members: layout.member_names(),
            rows,
        })
    }
}

impl TransactionStore for CsvTransactionStore {
    fn load(&self, location: &Path) -> Result<TransactionTable> {
        let file = File::open(location)
            .with_context(|| format!("Failed to open transactions: {}", location.display()))?;
        self.read_table(BufReader::new(file))
            .with_context(|| format!("Failed to read transactions: {}", location.display()))
    }
}

/// Column positions resolved from the header row.
struct Layout {
    date: usize,
    description: usize,
    category: usize,
    cost: usize,
    currency: Option<usize>,
    members: Vec<(usize, String)>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).with_context(|| format!("Missing required column '{name}'"))
        };

        let date = require(DATE)?;
        let description = require(DESCRIPTION)?;
        let category = require(CATEGORY)?;
        let cost = require(COST)?;
        let currency = find(CURRENCY);

        let fixed = [Some(date), Some(description), Some(category), Some(cost), currency];
        let mut members: Vec<(usize, String)> = Vec::new();
        for (i, name) in headers.iter().enumerate() {
            if fixed.contains(&Some(i)) || name.is_empty() {
                continue;
            }
            if members.iter().any(|(_, seen)| seen == name) {
                bail!("Duplicate member column '{name}'");
            }
            members.push((i, name.to_string()));
        }

        Ok(Self {
            date,
            description,
            category,
            cost,
            currency,
            members,
        })
    }

    fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|(_, name)| name.clone()).collect()
    }

    fn parse_row(&self, record: &StringRecord) -> Result<TransactionRow> {
        let cell = |i: usize| record.get(i).unwrap_or("");

        let date = parse_date(cell(self.date))?;
        let total_cost = parse_amount(cell(self.cost))
            .with_context(|| format!("Invalid cost '{}'", cell(self.cost)))?
            .unwrap_or(0.0);
        let currency = self
            .currency
            .map(|i| cell(i).to_string())
            .filter(|c| !c.is_empty());

        let mut shares = HashMap::new();
        for (i, member) in &self.members {
            let value = cell(*i);
            let share = parse_amount(value)
                .with_context(|| format!("Invalid share '{value}' for {member}"))?;
            if let Some(share) = share {
                shares.insert(member.clone(), share);
            }
        }

        Ok(TransactionRow {
            date,
            description: cell(self.description).to_string(),
            category: cell(self.category).to_string(),
            total_cost,
            currency,
            shares,
        })
    }
}

fn parse_amount(value: &str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(value.parse::<f64>()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    const EXPORT: &str = "\
Date,Description,Category,Cost,Currency,Alice,Bob
2024-01-05,Rent,Home,50.00,ILS,50.00,-50.00
2024-01-20,Dinner,Dining out,60.00,ILS,-20.00,20.00
2024-02-03,Coffee,Dining out,8.00,ILS,,8.00

2024-02-04 , Bus , Transport , 4.00 , ILS , 4.00 , -4.00
,Total balance,,,ILS,30.00,-30.00
";

    #[test]
    fn test_read_splitwise_export() {
        let table = CsvTransactionStore::new().read_table(EXPORT.as_bytes()).unwrap();

        assert_eq!(table.members, vec!["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(table.rows.len(), 4);

        let rent = &table.rows[0];
        assert_eq!(rent.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(rent.description, "Rent");
        assert_eq!(rent.category, "Home");
        assert_eq!(rent.total_cost, 50.0);
        assert_eq!(rent.currency.as_deref(), Some("ILS"));
        assert_eq!(rent.share_of("Alice"), 50.0);
        assert_eq!(rent.share_of("Bob"), -50.0);

        let coffee = &table.rows[2];
        assert!(!coffee.shares.contains_key("Alice"));
        assert_eq!(coffee.share_of("Alice"), 0.0);
        assert_eq!(table.rows_for_member("Alice").len(), 3);

        let bus = &table.rows[3];
        assert_eq!(bus.description, "Bus");
        assert_eq!(bus.category, "Transport");
        assert_eq!(bus.share_of("Bob"), -4.0);
    }

    #[test]
    fn test_currency_column_is_optional() {
        let data = "Date,Description,Category,Cost,Carol\n2024-03-01,Taxi,Transport,12.5,12.5\n";
        let table = CsvTransactionStore::new().read_table(data.as_bytes()).unwrap();

        assert_eq!(table.members, vec!["Carol".to_string()]);
        assert!(table.rows[0].currency.is_none());
    }

    #[test]
    fn test_missing_required_column_fails() {
        let data = "Date,Description,Cost,Alice\n2024-03-01,Taxi,12.5,12.5\n";
        let err = CsvTransactionStore::new()
            .read_table(data.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("Category"));
    }

    #[test]
    fn test_duplicate_member_column_fails() {
        let data = "Date,Description,Category,Cost,Alice,Alice\n2024-03-01,Taxi,Transport,10,10,-10\n";
        let err = CsvTransactionStore::new()
            .read_table(data.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate member column 'Alice'"));
    }

    #[test]
    fn test_bad_share_fails_with_line_number() {
        let data = "Date,Description,Category,Cost,Alice\n2024-03-01,Taxi,Transport,12.5,lots\n";
        let err = CsvTransactionStore::new()
            .read_table(data.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let table = CsvTransactionStore::new().load(file.path()).unwrap();
        assert_eq!(table.rows.len(), 4);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = CsvTransactionStore::new()
            .load(Path::new("/no/such/export.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/export.csv"));
    }
}
