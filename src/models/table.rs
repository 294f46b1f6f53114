use super::convolution::MeetingDistribution;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Probabilities for one meeting, aligned to [`RateExpectations::columns`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MeetingRow {
    pub meeting_date: NaiveDate,
    pub probabilities: Vec<f64>,
}

/// Market-implied probabilities of cumulative rate changes, one row per
/// upcoming meeting. Columns are every cumulative bp offset seen across
/// meetings, ascending; combinations a meeting cannot reach hold 0.0.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RateExpectations {
    pub reference_date: NaiveDate,
    pub columns: Vec<i32>,
    pub rows: Vec<MeetingRow>,
}

impl RateExpectations {
    pub fn from_path(reference_date: NaiveDate, path: &[MeetingDistribution]) -> Self {
        let columns: Vec<i32> = path
            .iter()
            .flat_map(|md| md.distribution.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = path
            .iter()
            .map(|md| MeetingRow {
                meeting_date: md.meeting_date,
                probabilities: columns
                    .iter()
                    .map(|bp| md.distribution.get(bp).copied().unwrap_or(0.0))
                    .collect(),
            })
            .collect();

        Self {
            reference_date,
            columns,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::binary::BinaryOutcome;
    use crate::models::convolution::cumulative_path;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_columns_are_union_and_missing_cells_zero() {
        let path = cumulative_path(&[
            BinaryOutcome { meeting_date: ymd(2023, 2, 1), sizes: [25, 50], probs: [0.6, 0.4] },
            BinaryOutcome { meeting_date: ymd(2023, 3, 22), sizes: [0, -25], probs: [0.5, 0.5] },
        ]);
        let table = RateExpectations::from_path(ymd(2023, 1, 10), &path);

        assert_eq!(table.columns, [0, 25, 50]);
        assert_eq!(table.rows.len(), 2);
        // Feb cannot reach 0bp; Mar reaches 25bp via +25 then 0, or +50 then -25.
        assert_eq!(table.rows[0].probabilities, [0.0, 0.6, 0.4]);
        assert!((table.rows[1].probabilities[1] - 0.5).abs() < 1e-12);

        for row in &table.rows {
            assert_eq!(row.probabilities.len(), table.columns.len());
            let total: f64 = row.probabilities.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "row {} sums to {total}", row.meeting_date);
        }
    }

    #[test]
    fn test_rows_follow_meeting_order() {
        let path = cumulative_path(&[
            BinaryOutcome { meeting_date: ymd(2023, 2, 1), sizes: [0, 25], probs: [0.5, 0.5] },
            BinaryOutcome { meeting_date: ymd(2023, 3, 22), sizes: [0, 25], probs: [0.5, 0.5] },
        ]);
        let table = RateExpectations::from_path(ymd(2023, 1, 10), &path);
        let dates: Vec<_> = table.rows.iter().map(|r| r.meeting_date).collect();
        assert_eq!(dates, [ymd(2023, 2, 1), ymd(2023, 3, 22)]);
    }
}
