//! Calendar helpers: inclusive date ranges and year-month buckets

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// Inclusive `[start, end]` filter over calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            bail!("Invalid date range: start {start} is after end {end}");
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds, normalizing timestamps to their calendar date.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start).context("Invalid start of date range")?;
        let end = parse_date(end).context("Invalid end of date range")?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .with_context(|| format!("Invalid date range '{s}', expected START..END"))?;
        Self::parse(start, end)
    }
}

/// Parses a date or timestamp string into a calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts.date());
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }
    bail!("Unrecognized date '{value}'")
}

/// Month bucket, ordered chronologically and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_accepts_dates_and_timestamps() {
        assert_eq!(parse_date("2024-03-05").unwrap(), date(2024, 3, 5));
        assert_eq!(parse_date("2024-03-05 18:30:00").unwrap(), date(2024, 3, 5));
        assert_eq!(parse_date("2024-03-05T18:30:00").unwrap(), date(2024, 3, 5));
        assert_eq!(
            parse_date("2024-03-05T23:30:00+02:00").unwrap(),
            date(2024, 3, 5)
        );
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert!(!range.contains(date(2023, 12, 31)));
    }

    #[test]
    fn test_malformed_bound_is_rejected() {
        let err = DateRange::parse("2024-01-01", "not-a-date").unwrap_err();
        assert!(err.to_string().contains("end of date range"));

        let err = DateRange::parse("01/02/2024", "2024-03-01").unwrap_err();
        assert!(err.to_string().contains("start of date range"));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = DateRange::parse("2024-05-01", "2024-01-01").unwrap_err();
        assert!(err.to_string().contains("is after end"));
    }

    #[test]
    fn test_from_str() {
        let range: DateRange = "2024-01-01..2024-06-30".parse().unwrap();
        assert_eq!(
            range,
            DateRange::new(date(2024, 1, 1), date(2024, 6, 30)).unwrap()
        );
        assert_eq!(range.to_string(), "2024-01-01..2024-06-30");
        assert!("2024-01-01".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_year_month_display_and_order() {
        let march = YearMonth::from(date(2024, 3, 17));
        let december = YearMonth::from(date(2023, 12, 1));
        assert_eq!(march.to_string(), "2024-03");
        assert!(december < march);
    }
}
