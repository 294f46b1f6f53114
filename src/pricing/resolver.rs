use super::series::{PriceSeries, PriceSource};
use super::MonthPriceRecord;
use crate::calendar::{ContractMonth, FomcCalendar};
use crate::errors::{FedWatchError, FedWatchResult};
use chrono::NaiveDate;

/// Date up to which observations of `month`'s contract are usable.
///
/// Live contracts (month at or after the reference month) use the reference
/// date. Expired contracts use the last day of their month, since some
/// sources keep printing stale values after expiry.
pub fn cutoff_date(month: ContractMonth, reference_date: NaiveDate) -> NaiveDate {
    if month >= ContractMonth::from_date(reference_date) {
        reference_date
    } else {
        month.last_day()
    }
}

/// Representative (average-rate) price for one contract month.
pub fn resolve_average(
    series: &PriceSeries,
    month: ContractMonth,
    reference_date: NaiveDate,
) -> FedWatchResult<f64> {
    let cutoff = cutoff_date(month, reference_date);
    series
        .last_on_or_before(cutoff)
        .map(|p| p.close)
        .ok_or_else(|| {
            FedWatchError::DataSufficiency(format!(
                "{}: no close on or before {cutoff} for contract month {month}",
                series.symbol()
            ))
        })
}

/// Fetches, validates and resolves every month of the calendar.
pub fn resolve_month_prices(
    calendar: &FomcCalendar,
    source: &dyn PriceSource,
) -> FedWatchResult<Vec<MonthPriceRecord>> {
    let reference_date = calendar.reference_date();

    calendar
        .entries()
        .iter()
        .map(|entry| {
            let raw = source.price_history(&entry.symbol)?;
            let series = PriceSeries::from_raw(&entry.symbol, raw)?;
            let avg = resolve_average(&series, entry.month, reference_date)?;
            tracing::debug!(
                symbol = %entry.symbol,
                month = %entry.month,
                avg = avg,
                rows = series.len(),
                source = source.name(),
                "resolved average price"
            );
            Ok(MonthPriceRecord::new(entry.month, entry.meeting, avg))
        })
        .collect()
}
