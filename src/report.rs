//! Presentation of rate expectation tables.
//! The numeric table stays keyed by integer bp offsets; labels are derived
//! here and never feed back into computation.

use crate::models::RateExpectations;
use chrono::NaiveDate;

/// Target range for the policy rate on the reference date, in percent.
/// Before ranges were introduced both bounds equal the single target.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RateRange {
    pub lower: f64,
    pub upper: f64,
}

impl RateRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn point(target: f64) -> Self {
        Self { lower: target, upper: target }
    }
}

/// Absolute rate label for a cumulative bp offset, e.g. `4.50-4.75`.
pub fn column_label(bp: i32, range: &RateRange) -> String {
    let shift = bp as f64 / 100.0;
    if range.upper - range.lower == 0.0 {
        format!("{:.2}", range.lower + shift)
    } else {
        format!("{:.2}-{:.2}", range.lower + shift, range.upper + shift)
    }
}

pub fn column_labels(columns: &[i32], range: &RateRange) -> Vec<String> {
    columns.iter().map(|bp| column_label(*bp, range)).collect()
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LabeledRow {
    pub meeting_date: NaiveDate,
    pub probabilities: Vec<f64>,
}

/// Table ready for display: one label per column, rows keyed by
/// (reference date, meeting date).
#[derive(Debug, Clone, serde::Serialize)]
pub struct LabeledTable {
    pub reference_date: NaiveDate,
    pub rate_range: Option<RateRange>,
    pub columns: Vec<String>,
    pub rows: Vec<LabeledRow>,
}

impl LabeledTable {
    /// Columns labelled with their bp offsets.
    pub fn offsets(table: &RateExpectations) -> Self {
        Self::build(table, None, table.columns.iter().map(|bp| bp.to_string()).collect())
    }

    /// Columns labelled with absolute rates shifted from `range`.
    pub fn with_rates(table: &RateExpectations, range: RateRange) -> Self {
        Self::build(table, Some(range), column_labels(&table.columns, &range))
    }

    fn build(table: &RateExpectations, rate_range: Option<RateRange>, columns: Vec<String>) -> Self {
        Self {
            reference_date: table.reference_date,
            rate_range,
            columns,
            rows: table
                .rows
                .iter()
                .map(|r| LabeledRow {
                    meeting_date: r.meeting_date,
                    probabilities: r.probabilities.clone(),
                })
                .collect(),
        }
    }
}
