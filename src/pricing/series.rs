use crate::calendar::parse_iso_date;
use crate::errors::{FedWatchError, FedWatchResult};
use chrono::NaiveDate;
use std::collections::HashMap;

/// One row as delivered by a price source, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: Option<String>,
    pub close: Option<f64>,
}

impl RawBar {
    #[allow(dead_code)]
    pub fn new(date: &str, close: f64) -> Self {
        Self {
            date: Some(date.to_string()),
            close: Some(close),
        }
    }
}

/// A validated daily close.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Validated closes for one contract, ascending by date.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates raw rows from a source. Every row needs a convertible date
    /// and a finite close; anything else is a configuration problem with the
    /// source, not missing market data.
    pub fn from_raw(symbol: &str, bars: Vec<RawBar>) -> FedWatchResult<Self> {
        let mut points = Vec::with_capacity(bars.len());
        for (row, bar) in bars.into_iter().enumerate() {
            let date_text = bar.date.ok_or_else(|| {
                FedWatchError::Configuration(format!("{symbol}: row {row} has no Date field"))
            })?;
            let date = parse_iso_date(&date_text).ok_or_else(|| {
                FedWatchError::Configuration(format!(
                    "{symbol}: row {row} has non-convertible Date '{date_text}'"
                ))
            })?;
            let close = bar.close.filter(|c| c.is_finite()).ok_or_else(|| {
                FedWatchError::Configuration(format!("{symbol}: row {row} ({date}) has no valid Close"))
            })?;
            points.push(PricePoint { date, close });
        }

        // Stable: for duplicate dates the later row wins lookups.
        points.sort_by_key(|p| p.date);

        Ok(Self {
            symbol: symbol.to_string(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Last observation dated on or before `cutoff`.
    pub fn last_on_or_before(&self, cutoff: NaiveDate) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date <= cutoff);
        idx.checked_sub(1).map(|i| &self.points[i])
    }
}

/// Capability interface for anything that can supply contract price history.
/// Implementations must be cheap and non-blocking: the pipeline calls them
/// synchronously, once per contract month.
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw daily rows for a Globex symbol such as `ZQH23`.
    fn price_history(&self, symbol: &str) -> FedWatchResult<Vec<RawBar>>;
}

/// Price source over fully materialized in-memory rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<String, Vec<RawBar>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<RawBar>) {
        self.series.insert(symbol.into(), bars);
    }

    #[allow(dead_code)]
    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<RawBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl PriceSource for InMemoryPriceSource {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn price_history(&self, symbol: &str) -> FedWatchResult<Vec<RawBar>> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| FedWatchError::DataSufficiency(format!("no price history for {symbol}")))
    }
}
