// Import module - fixed-schema trade files (CSV or JSON)

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::TaxError;
use crate::models::Trade;

/// One CSV row before validation; every cell is optional text
#[derive(Debug, Deserialize)]
struct CsvTradeRow {
    id: Option<String>,
    ticker: Option<String>,
    entry_date: Option<String>,
    exit_date: Option<String>,
    pnl: Option<String>,
}

/// Load trades from a file, choosing the parser by extension
pub fn load_trades<P: AsRef<Path>>(file_path: P) -> Result<Vec<Trade>> {
    let path = file_path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension"))?
        .to_lowercase();

    info!("Loading trades from {:?} (type: {})", path, extension);

    match extension.as_str() {
        "csv" => parse_trades_csv(path),
        "json" => parse_trades_json(path),
        other => Err(TaxError::Import(format!("unsupported file type: .{}", other)).into()),
    }
}

/// Parse a CSV with headers `id,ticker,entry_date,exit_date,pnl`.
/// Rows that cannot be parsed are skipped with a warning.
pub fn parse_trades_csv<P: AsRef<Path>>(file_path: P) -> Result<Vec<Trade>> {
    let path = file_path.as_ref();

    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut trades = Vec::new();

    for (idx, result) in reader.deserialize::<CsvTradeRow>().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                continue;
            }
        };

        match parse_row(row) {
            Ok(trade) => trades.push(trade),
            Err(e) => warn!("Skipping line {}: {}", line, e),
        }
    }

    info!("Parsed {} trades from CSV", trades.len());
    Ok(trades)
}

/// Parse a JSON array of trades
pub fn parse_trades_json<P: AsRef<Path>>(file_path: P) -> Result<Vec<Trade>> {
    let path = file_path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file {}", path.display()))?;
    let trades: Vec<Trade> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse trades from {}", path.display()))?;

    info!("Parsed {} trades from JSON", trades.len());
    Ok(trades)
}

fn parse_row(row: CsvTradeRow) -> std::result::Result<Trade, TaxError> {
    debug!("CSV row: {:?}", row);

    let entry_date = row
        .entry_date
        .as_deref()
        .ok_or_else(|| TaxError::Import("missing entry_date".to_string()))
        .and_then(parse_date)?;

    let exit_date = row.exit_date.as_deref().map(parse_date).transpose()?;

    let pnl = row
        .pnl
        .as_deref()
        .map(|s| {
            Decimal::from_str(s).map_err(|_| TaxError::Import(format!("invalid pnl '{}'", s)))
        })
        .transpose()?;

    Ok(Trade {
        id: row.id,
        ticker: row.ticker.unwrap_or_default(),
        entry_date,
        exit_date,
        pnl,
    })
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, TaxError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| TaxError::Import(format!("invalid date '{}': expected YYYY-MM-DD", s)))
}
