use crate::calendar::{parse_iso_date, ContractMonth};
use crate::errors::{FedWatchError, FedWatchResult};
use crate::pricing::series::{InMemoryPriceSource, RawBar};
use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

/// Reads scheduled meeting dates from the `Date` column of a CSV file.
/// Other columns are ignored. Returned dates are sorted and deduplicated.
pub fn load_meeting_dates(path: &Path) -> FedWatchResult<Vec<NaiveDate>> {
    let mut rdr = Reader::from_path(path)
        .map_err(|e| FedWatchError::Configuration(format!("{}: {e}", path.display())))?;

    let headers = rdr.headers()?.clone();
    let idx_date = column_index(&headers, "Date")
        .ok_or_else(|| FedWatchError::Configuration(format!("{}: no 'Date' column", path.display())))?;

    let mut dates = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = record.get(idx_date).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        let date = parse_iso_date(cell).ok_or_else(|| {
            FedWatchError::Configuration(format!(
                "{}: row {row} has malformed meeting date '{cell}'",
                path.display()
            ))
        })?;
        dates.push(date);
    }

    dates.sort_unstable();
    dates.dedup();

    tracing::info!(path = %path.display(), meetings = dates.len(), "meeting dates loaded");
    Ok(dates)
}

/// Reads `Date`/`Close` rows from one contract price CSV.
///
/// Blank or unparseable cells become `None`; rejecting them is left to
/// `PriceSeries::from_raw`, which validates every source the same way.
pub fn read_price_csv(path: &Path) -> FedWatchResult<Vec<RawBar>> {
    let mut rdr = Reader::from_path(path)
        .map_err(|e| FedWatchError::Configuration(format!("{}: {e}", path.display())))?;

    let headers = rdr.headers()?.clone();
    let idx_date = column_index(&headers, "Date")
        .ok_or_else(|| FedWatchError::Configuration(format!("{}: no 'Date' column", path.display())))?;
    let idx_close = column_index(&headers, "Close")
        .ok_or_else(|| FedWatchError::Configuration(format!("{}: no 'Close' column", path.display())))?;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let row = record?;
        let date = row
            .get(idx_date)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let close = row.get(idx_close).and_then(|c| c.trim().parse::<f64>().ok());
        bars.push(RawBar { date, close });
    }
    Ok(bars)
}

/// Loads every `<symbol>.csv` under `dir` into memory, keyed by upper-cased
/// file stem. Files whose stem is not a contract symbol are skipped.
pub fn load_contract_dir(dir: &Path) -> FedWatchResult<InMemoryPriceSource> {
    let mut source = InMemoryPriceSource::new();

    let entries = std::fs::read_dir(dir)
        .map_err(|e| FedWatchError::Configuration(format!("{}: {e}", dir.display())))?;
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        let Some(symbol) = path.file_stem().and_then(|s| s.to_str()).map(str::to_uppercase) else {
            continue;
        };
        if ContractMonth::from_symbol(&symbol).is_none() {
            tracing::warn!(path = %path.display(), "file name is not a contract symbol, skipped");
            continue;
        }
        let bars = read_price_csv(&path)?;
        tracing::debug!(symbol = %symbol, rows = bars.len(), "contract history loaded");
        source.insert(symbol, bars);
    }

    tracing::info!(dir = %dir.display(), contracts = source.len(), "contract price directory loaded");
    Ok(source)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}
