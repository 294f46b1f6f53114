use super::binary::BinaryOutcome;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Probability of each cumulative change (bp) over meetings 1..k.
pub type CumulativeDistribution = BTreeMap<i32, f64>;

/// Cumulative distribution after one meeting, keyed by its date.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingDistribution {
    pub meeting_date: NaiveDate,
    pub distribution: CumulativeDistribution,
}

/// Folds one more meeting into a running distribution: sizes add, probabilities
/// multiply, equal resulting sizes merge.
pub fn convolve(prior: &CumulativeDistribution, outcome: &BinaryOutcome) -> CumulativeDistribution {
    let mut next = CumulativeDistribution::new();
    for (&prior_size, &prior_prob) in prior {
        for (size, prob) in outcome.pairs() {
            *next.entry(prior_size + size).or_insert(0.0) += prior_prob * prob;
        }
    }
    next
}

/// Sequential left fold over meetings in chronological order. The first
/// meeting's distribution is its own outcome; each later one builds on the
/// previous meeting's result.
pub fn cumulative_path(outcomes: &[BinaryOutcome]) -> Vec<MeetingDistribution> {
    let mut running = CumulativeDistribution::from([(0, 1.0)]);
    let mut path = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        running = convolve(&running, outcome);
        path.push(MeetingDistribution {
            meeting_date: outcome.meeting_date,
            distribution: running.clone(),
        });
    }
    path
}
