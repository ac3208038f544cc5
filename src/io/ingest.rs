//! CSV ingest and normalization.
//!
//! Two inputs are read once at startup:
//!
//! - a wide exchange-rate table: an index column, a date column, then one
//!   column per currency
//! - a wide inflation table: `Country`, `Series_Name`, then one column per year
//!
//! Design goals:
//! - **Strict schema** for the date and key columns (clear errors + exit code 2)
//! - **All-or-nothing rows** for rates: one bad cell drops the whole row
//! - **Deterministic behavior**: file column order is preserved

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{CurrencySeries, InflationObservation, InflationTable, RateTable};
use crate::error::AppError;

/// Header names accepted for the rate table's date column.
const DATE_HEADERS: [&str; 2] = ["time serie", "date"];

/// Currency columns start at this position in the rate table.
const FIRST_CURRENCY_COLUMN: usize = 2;

/// Row accounting for the rate table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows with at least one missing or non-numeric currency value.
    pub rows_invalid: usize,
    /// Rows whose date repeated an earlier row.
    pub rows_duplicate: usize,
}

/// Open and clean the exchange-rate CSV.
pub fn load_rates(path: &Path) -> Result<(RateTable, IngestReport), AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open rates CSV '{}': {e}", path.display())))?;
    let (table, report) = read_rates(file)?;
    info!(
        path = %path.display(),
        rows_read = report.rows_read,
        rows_used = report.rows_used,
        rows_invalid = report.rows_invalid,
        rows_duplicate = report.rows_duplicate,
        currencies = table.currencies.len(),
        "loaded exchange rates"
    );
    Ok((table, report))
}

/// Clean an exchange-rate CSV from any reader.
pub fn read_rates<R: Read>(reader: R) -> Result<(RateTable, IngestReport), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read rates CSV headers: {e}")))?
        .clone();

    let date_idx = headers
        .iter()
        .position(|h| DATE_HEADERS.contains(&normalize_header_name(h).as_str()))
        .ok_or_else(|| AppError::input("Missing date column in rates CSV (expected `Time Serie` or `Date`)."))?;

    let currency_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .skip(FIRST_CURRENCY_COLUMN)
        .filter(|(idx, _)| *idx != date_idx)
        .map(|(idx, name)| (idx, name.trim().trim_start_matches('\u{feff}').to_string()))
        .collect();

    if currency_cols.is_empty() {
        return Err(AppError::input("Rates CSV has no currency columns (expected from column 3 onward)."));
    }

    let mut report = IngestReport::default();
    let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let line = idx + 2;
        report.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(line, error = %e, "dropping unreadable rates row");
                report.rows_invalid += 1;
                continue;
            }
        };

        let raw_date = record.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date).map_err(|e| AppError::input(format!("Rates CSV line {line}: {e}")))?;

        match parse_rate_cells(&record, &currency_cols) {
            Some(values) => rows.push((date, values)),
            None => report.rows_invalid += 1,
        }
    }

    rows.sort_by_key(|(date, _)| *date);
    let before = rows.len();
    rows.dedup_by_key(|(date, _)| *date);
    report.rows_duplicate = before - rows.len();
    report.rows_used = rows.len();

    if rows.is_empty() {
        return Err(AppError::new(3, "No valid rows remain in the rates CSV after cleaning."));
    }

    let mut currencies: Vec<CurrencySeries> = currency_cols
        .into_iter()
        .map(|(_, code)| CurrencySeries {
            code,
            values: Vec::with_capacity(rows.len()),
        })
        .collect();
    let mut dates = Vec::with_capacity(rows.len());
    for (date, values) in rows {
        dates.push(date);
        for (series, value) in currencies.iter_mut().zip(values) {
            series.values.push(value);
        }
    }

    Ok((RateTable { dates, currencies }, report))
}

/// Every currency cell must hold a finite number; `ND` and blanks fail.
fn parse_rate_cells(record: &StringRecord, columns: &[(usize, String)]) -> Option<Vec<f64>> {
    columns
        .iter()
        .map(|(idx, _)| parse_opt_f64(record.get(*idx)))
        .collect()
}

/// Open and reshape the inflation CSV.
pub fn load_inflation(path: &Path) -> Result<InflationTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open inflation CSV '{}': {e}", path.display())))?;
    let table = read_inflation(file)?;
    info!(
        path = %path.display(),
        observations = table.observations.len(),
        series = table.series_names.len(),
        "loaded inflation data"
    );
    Ok(table)
}

/// Reshape a wide inflation CSV (one column per year) into long form.
pub fn read_inflation<R: Read>(reader: R) -> Result<InflationTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read inflation CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let country_idx = *header_map
        .get("country")
        .ok_or_else(|| AppError::input("Missing required column in inflation CSV: `Country`"))?;
    let series_idx = *header_map
        .get("series_name")
        .ok_or_else(|| AppError::input("Missing required column in inflation CSV: `Series_Name`"))?;

    let mut year_cols: Vec<(usize, i32)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx == country_idx || idx == series_idx {
            continue;
        }
        match name.trim().parse::<i32>() {
            Ok(year) => year_cols.push((idx, year)),
            Err(_) => warn!(column = name, "skipping non-year column in inflation CSV"),
        }
    }

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("Inflation CSV line {line}: {e}")))?;

        let country = record.get(country_idx).unwrap_or("").to_string();
        let series_name = record.get(series_idx).unwrap_or("").to_string();

        for (col, year) in &year_cols {
            observations.push(InflationObservation {
                country: country.clone(),
                series_name: series_name.clone(),
                year: *year,
                inflation_rate: parse_opt_f64(record.get(*col)),
            });
        }
    }

    Ok(InflationTable::from_observations(observations))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
