//! Score arithmetic shared by the chart passes.

use crate::common::MATCH_TOLERANCE;

/// Log-probability stored in the chart.
pub type Score = f32;

/// The "infeasible" score every chart cell starts from.
pub const NEG_INF: Score = Score::NEG_INFINITY;

/// Checks whether two sums of logs are equal up to the relative [`MATCH_TOLERANCE`].
#[inline(always)]
pub fn matches(x: f64, y: f64) -> bool {
    if x == y {
        // covers -inf == -inf, for which the relative error below is NaN
        return true;
    }
    (x - y).abs() / (x.abs() + y.abs() + 1e-10) < MATCH_TOLERANCE
}

/// Returns `true` when the score is not the infeasible sentinel.
#[inline(always)]
pub fn is_feasible(score: Score) -> bool {
    score > NEG_INF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_tolerance() {
        assert!(matches(-10.0, -10.000001));
        assert!(!matches(-10.0, -10.01));
        assert!(matches(0.0, 0.0));
        assert!(matches(f64::NEG_INFINITY, f64::NEG_INFINITY));
        assert!(!matches(f64::NEG_INFINITY, -3.0));
    }

    #[test]
    fn test_infeasible_sums_stay_infeasible() {
        assert!(!is_feasible(NEG_INF + NEG_INF));
        assert!(!is_feasible(NEG_INF + -1.5));
        assert!(is_feasible(-1e30));
    }
}
