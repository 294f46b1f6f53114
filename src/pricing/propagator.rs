use super::{MonthPriceRecord, ResolvedMonth};
use crate::errors::{FedWatchError, FedWatchResult};
use chrono::Datelike;

/// Fills start/end prices of meeting months.
///
/// The first and last records must be meeting-free. Forward pass copies
/// neighbouring resolved prices into unresolved slots; backward pass takes
/// end prices from the next month's start and, where a start is still
/// missing, solves it from the month average:
///
/// avg = (n * start + m * end) / (m + n)
///
/// with m = days from the meeting through month end and n = days before it.
pub fn propagate(records: &[MonthPriceRecord]) -> FedWatchResult<Vec<ResolvedMonth>> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(FedWatchError::DataSufficiency("empty month list".into()));
    };
    if records.len() < 2 || first.meeting.is_some() || last.meeting.is_some() {
        return Err(FedWatchError::DataSufficiency(format!(
            "month list {}..{} must start and end with meeting-free months",
            first.month, last.month
        )));
    }

    let mut start: Vec<Option<f64>> = records.iter().map(|r| r.start).collect();
    let mut end: Vec<Option<f64>> = records.iter().map(|r| r.end).collect();
    let last_idx = records.len() - 1;

    for i in 1..last_idx {
        if start[i].is_none() && end[i - 1].is_some() {
            start[i] = end[i - 1];
        }
        if end[i].is_none() && start[i + 1].is_some() {
            end[i] = start[i + 1];
        }
    }

    for i in (1..last_idx).rev() {
        if end[i].is_none() {
            end[i] = start[i + 1];
        }
        if start[i].is_none() {
            start[i] = Some(interpolate_start(&records[i], end[i])?);
        }
    }

    records
        .iter()
        .zip(start.into_iter().zip(end))
        .map(|(r, (s, e))| match (s, e) {
            (Some(start), Some(end)) => Ok(ResolvedMonth {
                month: r.month,
                meeting: r.meeting,
                start,
                avg: r.avg,
                end,
            }),
            _ => Err(FedWatchError::DataSufficiency(format!(
                "prices for {} could not be resolved",
                r.month
            ))),
        })
        .collect()
}

fn interpolate_start(record: &MonthPriceRecord, end: Option<f64>) -> FedWatchResult<f64> {
    let meeting = record.meeting.ok_or_else(|| {
        FedWatchError::DataSufficiency(format!("{} has no meeting but an unresolved start", record.month))
    })?;
    let end = end.ok_or_else(|| {
        FedWatchError::DataSufficiency(format!("{}: end price unresolved", record.month))
    })?;

    let days = record.month.days_in_month() as f64;
    let m = days - meeting.day() as f64 + 1.0;
    let n = days - m;
    if n == 0.0 {
        return Err(FedWatchError::Arithmetic(format!(
            "meeting on {meeting} is the first day of {}; start price cannot be \
             interpolated from the month average",
            record.month
        )));
    }

    Ok((record.avg * (m + n) - m * end) / n)
}
