pub mod propagator;
pub mod resolver;
pub mod series;

use crate::calendar::ContractMonth;
use chrono::NaiveDate;

/// Prices for one contract month before propagation.
///
/// `avg` is always known. Meeting-free months carry `start == avg == end`;
/// meeting months start with `start` and `end` unresolved.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MonthPriceRecord {
    pub month: ContractMonth,
    pub meeting: Option<NaiveDate>,
    pub start: Option<f64>,
    pub avg: f64,
    pub end: Option<f64>,
}

impl MonthPriceRecord {
    pub fn new(month: ContractMonth, meeting: Option<NaiveDate>, avg: f64) -> Self {
        match meeting {
            None => Self {
                month,
                meeting,
                start: Some(avg),
                avg,
                end: Some(avg),
            },
            Some(_) => Self {
                month,
                meeting,
                start: None,
                avg,
                end: None,
            },
        }
    }
}

/// Prices for one contract month with start, average and end all known.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ResolvedMonth {
    pub month: ContractMonth,
    pub meeting: Option<NaiveDate>,
    pub start: f64,
    pub avg: f64,
    pub end: f64,
}
