//! Price file loading.
//!
//! The input is a CSV file with at least a `date` and a `close` column; any
//! other columns are ignored. Rows are sorted by date, and an empty `close`
//! cell is kept as a missing price; converting to returns forward-fills it
//! from the previous close.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};
use varback_risk::prelude::ReturnSeries;

use crate::error::{CliError, CliResult};

/// Columns every price file must have.
const REQUIRED_COLUMNS: [&str; 2] = ["date", "close"];

#[derive(Debug, Deserialize)]
struct PriceRecord {
    date: String,
    close: Option<f64>,
}

/// Parses `YYYY-MM-DD`, also accepting a date-time whose first ten
/// characters are such a date.
pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|e| match s.get(..10) {
            Some(prefix) if s.len() > 10 => NaiveDate::parse_from_str(prefix, "%Y-%m-%d"),
            _ => Err(e),
        })
        .map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Loads dated close prices, sorted by date.
///
/// Missing closes are returned as NaN.
pub fn load_prices(path: &Path) -> CliResult<Vec<(NaiveDate, f64)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if REQUIRED_COLUMNS
        .iter()
        .any(|required| !headers.iter().any(|h| h == *required))
    {
        return Err(CliError::data(path, "CSV must contain columns: date, close"));
    }

    let mut prices = Vec::new();
    let mut missing = 0usize;
    for record in reader.deserialize::<PriceRecord>() {
        let record = record?;
        let date = parse_date(&record.date)?;
        let close = record.close.unwrap_or_else(|| {
            missing += 1;
            f64::NAN
        });
        prices.push((date, close));
    }

    if prices.is_empty() {
        return Err(CliError::data(path, "no price rows"));
    }
    if missing > 0 {
        warn!(
            "{missing} missing close price(s) in {}, forward-filling from the previous close",
            path.display()
        );
    }
    prices.sort_by_key(|(date, _)| *date);

    debug!("loaded {} prices from {}", prices.len(), path.display());
    Ok(prices)
}

/// Loads prices and converts them to a return series.
pub fn load_returns(path: &Path) -> CliResult<ReturnSeries> {
    let prices = load_prices(path)?;
    Ok(ReturnSeries::from_prices(&prices)?)
}
