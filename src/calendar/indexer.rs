use super::months::ContractMonth;
use crate::errors::{FedWatchError, FedWatchResult};
use chrono::NaiveDate;

/// One month of the FOMC calendar.
///
/// `order` is 0 for months without a meeting, -1, -2, ... for past meetings
/// counting back from the reference date, and 1, 2, ... for upcoming ones.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CalendarEntry {
    pub month: ContractMonth,
    pub symbol: String,
    pub meeting: Option<NaiveDate>,
    pub order: i32,
}

impl CalendarEntry {
    #[inline]
    pub fn has_meeting(&self) -> bool {
        self.meeting.is_some()
    }

    #[inline]
    pub fn is_upcoming_within(&self, horizon: usize) -> bool {
        self.order > 0 && self.order as usize <= horizon
    }
}

/// Ordered month calendar anchored to a reference date.
///
/// Starts at the nearest month at or before the reference month without a
/// meeting and ends at the first meeting-free month after `horizon` upcoming
/// meetings. Both endpoints are meeting-free, so their contracts pin the
/// start and end prices of the meeting months in between.
#[derive(Debug, Clone)]
pub struct FomcCalendar {
    reference_date: NaiveDate,
    horizon: usize,
    entries: Vec<CalendarEntry>,
}

impl FomcCalendar {
    pub fn build(
        reference_date: NaiveDate,
        meetings: &[NaiveDate],
        horizon: usize,
    ) -> FedWatchResult<Self> {
        if horizon == 0 {
            return Err(FedWatchError::Configuration(
                "number of upcoming meetings must be at least 1".into(),
            ));
        }

        let mut meetings = meetings.to_vec();
        meetings.sort_unstable();
        meetings.dedup();

        let reference_month = ContractMonth::from_date(reference_date);
        let first = starting_month(reference_month, &meetings)?;
        let last = ending_month(reference_date, &meetings, horizon)?;

        let mut entries = Vec::new();
        let mut month = first;
        while month <= last {
            entries.push(CalendarEntry {
                month,
                symbol: month.symbol(),
                meeting: meeting_in(month, &meetings),
                order: 0,
            });
            month = month.succ();
        }

        assign_orders(reference_date, &mut entries);

        tracing::debug!(
            reference = %reference_date,
            first = %first,
            last = %last,
            months = entries.len(),
            "calendar built"
        );

        Ok(Self {
            reference_date,
            horizon,
            entries,
        })
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    /// Meeting months with order in `1..=horizon`, chronological.
    pub fn upcoming(&self) -> impl Iterator<Item = &CalendarEntry> {
        self.entries
            .iter()
            .filter(move |e| e.is_upcoming_within(self.horizon))
    }
}

/// First scheduled meeting inside `month`, if any.
fn meeting_in(month: ContractMonth, meetings: &[NaiveDate]) -> Option<NaiveDate> {
    meetings.iter().copied().find(|d| month.contains(*d))
}

/// Walks back from the reference month to the first month without a meeting.
fn starting_month(
    reference_month: ContractMonth,
    meetings: &[NaiveDate],
) -> FedWatchResult<ContractMonth> {
    let earliest = meetings.first().copied().map(ContractMonth::from_date);
    let mut month = reference_month;

    loop {
        if meeting_in(month, meetings).is_none() {
            return Ok(month);
        }
        // The list says nothing about months before its first meeting.
        if earliest.is_some_and(|e| month <= e) {
            return Err(FedWatchError::DataSufficiency(format!(
                "no meeting-free month found at or before {reference_month}; \
                 the scheduled meeting list must start earlier"
            )));
        }
        month = month.pred();
    }
}

/// Walks forward from the reference month, counting months with an upcoming
/// meeting, and stops at the first meeting-free month once `horizon` is met.
///
/// A month counts only if the meeting `meeting_in` picks for it is upcoming,
/// the same rule `assign_orders` applies. `meetings` must be sorted.
fn ending_month(
    reference_date: NaiveDate,
    meetings: &[NaiveDate],
    horizon: usize,
) -> FedWatchResult<ContractMonth> {
    let mut upcoming: Vec<ContractMonth> = Vec::new();
    let mut last_month = None;
    for date in meetings {
        let month = ContractMonth::from_date(*date);
        if last_month == Some(month) {
            continue;
        }
        last_month = Some(month);
        if *date > reference_date {
            upcoming.push(month);
        }
    }

    if upcoming.len() < horizon {
        return Err(FedWatchError::DataSufficiency(format!(
            "only {} meetings scheduled after {reference_date}, {horizon} requested; \
             extend the scheduled meeting list",
            upcoming.len()
        )));
    }

    let mut month = ContractMonth::from_date(reference_date);
    let mut counted = 0usize;
    loop {
        if upcoming.binary_search(&month).is_ok() {
            counted += 1;
        } else if counted >= horizon {
            return Ok(month);
        }
        month = month.succ();
    }
}

fn assign_orders(reference_date: NaiveDate, entries: &mut [CalendarEntry]) {
    let reference_month = ContractMonth::from_date(reference_date);
    let Some(idx) = entries.iter().position(|e| e.month == reference_month) else {
        return;
    };

    // A meeting held on the reference date itself already counts as past.
    let reference_is_past = entries[idx].meeting.map_or(true, |d| d <= reference_date);
    let split = if reference_is_past { idx + 1 } else { idx };
    let (backward, forward) = entries.split_at_mut(split);

    let mut counter = -1;
    for entry in backward.iter_mut().rev() {
        if entry.has_meeting() {
            entry.order = counter;
            counter -= 1;
        } else {
            entry.order = 0;
        }
    }

    let mut counter = 1;
    for entry in forward.iter_mut() {
        if entry.has_meeting() {
            entry.order = counter;
            counter += 1;
        } else {
            entry.order = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 2022-2023 FOMC schedule.
    fn schedule() -> Vec<NaiveDate> {
        vec![
            ymd(2022, 1, 26),
            ymd(2022, 3, 16),
            ymd(2022, 5, 4),
            ymd(2022, 6, 15),
            ymd(2022, 7, 27),
            ymd(2022, 9, 21),
            ymd(2022, 11, 2),
            ymd(2022, 12, 14),
            ymd(2023, 2, 1),
            ymd(2023, 3, 22),
            ymd(2023, 5, 3),
            ymd(2023, 6, 14),
            ymd(2023, 7, 26),
            ymd(2023, 9, 20),
            ymd(2023, 11, 1),
            ymd(2023, 12, 13),
        ]
    }

    fn months(cal: &FomcCalendar) -> Vec<String> {
        cal.entries().iter().map(|e| e.month.to_string()).collect()
    }

    fn orders(cal: &FomcCalendar) -> Vec<i32> {
        cal.entries().iter().map(|e| e.order).collect()
    }

    #[test]
    fn test_reference_in_meeting_free_month() {
        let cal = FomcCalendar::build(ymd(2023, 1, 10), &schedule(), 2).unwrap();
        assert_eq!(months(&cal), ["2023-01", "2023-02", "2023-03", "2023-04"]);
        assert_eq!(orders(&cal), [0, 1, 2, 0]);
        let symbols: Vec<_> = cal.entries().iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, ["ZQF23", "ZQG23", "ZQH23", "ZQJ23"]);
    }

    #[test]
    fn test_reference_before_meeting_in_same_month() {
        // Dec 2022 meeting is still ahead on Dec 1st.
        let cal = FomcCalendar::build(ymd(2022, 12, 1), &schedule(), 2).unwrap();
        // March 2023 also has a meeting, so the scan runs on to April.
        assert_eq!(
            months(&cal),
            ["2022-10", "2022-11", "2022-12", "2023-01", "2023-02", "2023-03", "2023-04"]
        );
        assert_eq!(orders(&cal), [0, -1, 1, 0, 2, 3, 0]);
    }

    #[test]
    fn test_reference_after_meeting_in_same_month() {
        let cal = FomcCalendar::build(ymd(2022, 12, 20), &schedule(), 2).unwrap();
        assert_eq!(
            months(&cal),
            ["2022-10", "2022-11", "2022-12", "2023-01", "2023-02", "2023-03", "2023-04"]
        );
        assert_eq!(orders(&cal), [0, -2, -1, 0, 1, 2, 0]);
    }

    #[test]
    fn test_meeting_on_reference_date_is_past() {
        let cal = FomcCalendar::build(ymd(2023, 3, 22), &schedule(), 1).unwrap();
        let march = cal
            .entries()
            .iter()
            .find(|e| e.month.to_string() == "2023-03")
            .unwrap();
        assert_eq!(march.order, -1);
        let upcoming: Vec<_> = cal.upcoming().map(|e| e.meeting.unwrap()).collect();
        assert_eq!(upcoming, [ymd(2023, 5, 3)]);
        assert_eq!(cal.entries().last().unwrap().month.to_string(), "2023-08");
    }

    #[test]
    fn test_month_list_is_contiguous_with_free_endpoints() {
        for (reference, horizon) in [
            (ymd(2022, 2, 10), 5),
            (ymd(2022, 6, 1), 3),
            (ymd(2022, 7, 28), 8),
            (ymd(2023, 1, 31), 4),
        ] {
            let cal = FomcCalendar::build(reference, &schedule(), horizon).unwrap();
            let entries = cal.entries();
            assert!(!entries.first().unwrap().has_meeting(), "first month has meeting for {reference}");
            assert!(!entries.last().unwrap().has_meeting(), "last month has meeting for {reference}");
            for pair in entries.windows(2) {
                assert_eq!(pair[0].month.succ(), pair[1].month, "gap in month list for {reference}");
            }
            assert_eq!(cal.upcoming().count(), horizon);
        }
    }

    #[test]
    fn test_orders_are_consecutive() {
        let cal = FomcCalendar::build(ymd(2022, 7, 28), &schedule(), 4).unwrap();
        let mut past = Vec::new();
        let mut future = Vec::new();
        for e in cal.entries() {
            match (e.has_meeting(), e.order) {
                (false, o) => assert_eq!(o, 0, "meeting-free month {} has order {o}", e.month),
                (true, 0) => panic!("meeting month {} has order 0", e.month),
                (true, o) if o < 0 => past.push(o),
                (true, o) => future.push(o),
            }
        }
        assert_eq!(past, (-(past.len() as i32)..=-1).collect::<Vec<_>>());
        assert_eq!(future, (1..=future.len() as i32).collect::<Vec<_>>());
    }

    #[test]
    fn test_unsorted_duplicate_meetings_are_normalized() {
        let mut meetings = schedule();
        meetings.reverse();
        meetings.push(ymd(2023, 2, 1));
        let a = FomcCalendar::build(ymd(2023, 1, 10), &meetings, 3).unwrap();
        let b = FomcCalendar::build(ymd(2023, 1, 10), &schedule(), 3).unwrap();
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_backward_scan_exhausts_list() {
        // Every month from Jan 2022 onward has a meeting in this list.
        let meetings = vec![ymd(2022, 1, 26), ymd(2022, 2, 16), ymd(2022, 3, 16), ymd(2022, 5, 4)];
        let err = FomcCalendar::build(ymd(2022, 3, 1), &meetings, 1).unwrap_err();
        assert!(matches!(err, FedWatchError::DataSufficiency(_)), "got {err}");
    }

    #[test]
    fn test_too_few_upcoming_meetings() {
        let err = FomcCalendar::build(ymd(2023, 10, 2), &schedule(), 3).unwrap_err();
        match err {
            FedWatchError::DataSufficiency(msg) => assert!(msg.contains("only 2 meetings"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_second_meeting_in_past_month_not_counted() {
        // March's first meeting is past on the 10th; only that one is used.
        let meetings = vec![
            ymd(2020, 1, 29),
            ymd(2020, 3, 3),
            ymd(2020, 3, 15),
            ymd(2020, 4, 29),
            ymd(2020, 6, 10),
        ];
        let cal = FomcCalendar::build(ymd(2020, 3, 10), &meetings, 2).unwrap();
        assert_eq!(
            months(&cal),
            ["2020-02", "2020-03", "2020-04", "2020-05", "2020-06", "2020-07"]
        );
        assert_eq!(orders(&cal), [0, -1, 1, 0, 2, 0]);
        assert_eq!(cal.upcoming().count(), 2);

        let err = FomcCalendar::build(ymd(2020, 3, 10), &meetings, 3).unwrap_err();
        assert!(matches!(err, FedWatchError::DataSufficiency(ref m) if m.contains("only 2 meetings")), "got {err}");
    }

    #[test]
    fn test_horizon_reaching_last_meeting() {
        let cal = FomcCalendar::build(ymd(2023, 10, 2), &schedule(), 2).unwrap();
        assert_eq!(cal.entries().last().unwrap().month.to_string(), "2024-01");
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = FomcCalendar::build(ymd(2023, 1, 10), &schedule(), 0).unwrap_err();
        assert!(matches!(err, FedWatchError::Configuration(_)));
    }
}
