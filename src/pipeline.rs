use crate::calendar::{ContractMonth, FomcCalendar};
use crate::errors::{FedWatchError, FedWatchResult};
use crate::models::{binary_outcome, cumulative_path, BinaryOutcome, RateExpectations};
use crate::pricing::propagator::propagate;
use crate::pricing::resolver::resolve_month_prices;
use crate::pricing::series::PriceSource;
use crate::pricing::ResolvedMonth;
use chrono::NaiveDate;

/// FedWatch computation for one reference date and horizon.
///
/// Owns the calendar; every later stage returns a fresh snapshot derived
/// from the previous one:
///
///   calendar -> resolved averages -> propagated prices -> binary outcomes
///            -> cumulative path -> table
///
/// Synchronous and deterministic. Either the full table for the requested
/// horizon is produced or an error is returned.
#[derive(Debug, Clone)]
pub struct FedWatch {
    calendar: FomcCalendar,
}

/// One line of the calendar summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SummaryRow {
    pub month: ContractMonth,
    pub symbol: String,
    pub meeting: Option<NaiveDate>,
    pub order: i32,
    pub start: f64,
    pub avg: f64,
    pub end: f64,
}

impl FedWatch {
    pub fn new(reference_date: NaiveDate, horizon: usize, meetings: &[NaiveDate]) -> FedWatchResult<Self> {
        let calendar = FomcCalendar::build(reference_date, meetings, horizon)?;
        Ok(Self { calendar })
    }

    /// Resolved and propagated prices for every calendar month.
    pub fn month_prices(&self, source: &dyn PriceSource) -> FedWatchResult<Vec<ResolvedMonth>> {
        let records = resolve_month_prices(&self.calendar, source)?;
        let resolved = propagate(&records)?;
        tracing::debug!(months = resolved.len(), "month prices propagated");
        Ok(resolved)
    }

    /// Binary outcomes for upcoming meetings within the horizon, by date.
    pub fn binary_outcomes(&self, months: &[ResolvedMonth]) -> Vec<BinaryOutcome> {
        self.calendar
            .upcoming()
            .filter_map(|entry| {
                let date = entry.meeting?;
                let m = months.iter().find(|m| m.month == entry.month)?;
                Some(binary_outcome(date, m.start, m.end))
            })
            .collect()
    }

    /// Like [`binary_outcomes`](Self::binary_outcomes), but fails unless every
    /// meeting in the horizon has an outcome.
    fn horizon_outcomes(&self, months: &[ResolvedMonth]) -> FedWatchResult<Vec<BinaryOutcome>> {
        let outcomes = self.binary_outcomes(months);
        let horizon = self.calendar.horizon();
        if outcomes.len() != horizon {
            return Err(FedWatchError::DataSufficiency(format!(
                "{} of {horizon} upcoming meetings after {} have prices",
                outcomes.len(),
                self.calendar.reference_date()
            )));
        }
        Ok(outcomes)
    }

    pub fn rate_expectations(&self, source: &dyn PriceSource) -> FedWatchResult<RateExpectations> {
        let months = self.month_prices(source)?;
        let outcomes = self.horizon_outcomes(&months)?;
        let path = cumulative_path(&outcomes);
        let table = RateExpectations::from_path(self.calendar.reference_date(), &path);

        tracing::info!(
            reference = %self.calendar.reference_date(),
            horizon = self.calendar.horizon(),
            meetings = table.rows.len(),
            columns = table.columns.len(),
            "rate expectations computed"
        );
        Ok(table)
    }

    /// Calendar joined with propagated prices.
    pub fn summary(&self, source: &dyn PriceSource) -> FedWatchResult<Vec<SummaryRow>> {
        let months = self.month_prices(source)?;
        Ok(self
            .calendar
            .entries()
            .iter()
            .zip(&months)
            .map(|(entry, m)| SummaryRow {
                month: entry.month,
                symbol: entry.symbol.clone(),
                meeting: entry.meeting,
                order: entry.order,
                start: m.start,
                avg: m.avg,
                end: m.end,
            })
            .collect())
    }
}
