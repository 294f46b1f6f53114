use chrono::NaiveDate;

/// Contracts settle in 25bp increments.
pub const STEP_BP: i32 = 25;

/// Two-point distribution over the 25bp multiples bracketing a meeting's
/// implied rate change.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BinaryOutcome {
    pub meeting_date: NaiveDate,
    pub sizes: [i32; 2],
    pub probs: [f64; 2],
}

impl BinaryOutcome {
    pub fn pairs(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.sizes.iter().copied().zip(self.probs.iter().copied())
    }
}

/// Change in implied rate over the meeting month, in 25bp steps.
/// Futures are quoted as 100 minus the rate.
#[inline]
pub fn implied_change(start_price: f64, end_price: f64) -> f64 {
    ((100.0 - end_price) - (100.0 - start_price)) / 25.0 * 100.0
}

/// Splits a real-valued step change into its two bracketing sizes.
///
/// The whole-step part is certain; the fractional part is the probability
/// of one further step in the direction of the change. Only two outcomes
/// are produced however large the move.
pub fn binary_outcome(meeting_date: NaiveDate, start_price: f64, end_price: f64) -> BinaryOutcome {
    let change = implied_change(start_price, end_price);
    let direction = if change > 0.0 {
        1
    } else if change < 0.0 {
        -1
    } else {
        0
    };

    let s0 = change.trunc() as i32 * STEP_BP;
    let s1 = s0 + STEP_BP * direction;
    let p1 = change.abs().fract();

    BinaryOutcome {
        meeting_date,
        sizes: [s0, s1],
        probs: [1.0 - p1, p1],
    }
}
