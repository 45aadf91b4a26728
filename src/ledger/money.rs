//! Numeric tolerance shared by every settlement computation.
//!
//! Amounts are plain `f64` currency units. Every comparison goes through
//! [`TOLERANCE`] so share validation, balance checks and debt matching agree
//! on what "zero" means.

/// Absolute tolerance, in currency units, below which a difference is ignored.
pub const TOLERANCE: f64 = 0.01;

/// Sum that percentage splits must reach.
pub const FULL_PERCENTAGE: f64 = 100.0;

/// True when `value` is too small to matter.
pub fn is_negligible(value: f64) -> bool {
    value.abs() < TOLERANCE
}

/// Slack for binary rounding, so a difference of exactly one cent still
/// counts as within [`TOLERANCE`].
const FLOAT_SLACK: f64 = 1e-9;

/// True when `a` and `b` differ by no more than [`TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE + FLOAT_SLACK
}

/// Rounds to two decimal places, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Valid amounts are finite and strictly positive.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negligible_is_strictly_below_tolerance() {
        assert!(is_negligible(0.009));
        assert!(is_negligible(-0.009));
        assert!(!is_negligible(0.01));
    }

    #[test]
    fn approx_eq_is_inclusive() {
        assert!(approx_eq(100.0, 99.995));
        assert!(approx_eq(100.0, 100.005));
        assert!(!approx_eq(100.0, 99.0));
    }

    #[test]
    fn approx_eq_accepts_exact_cent_boundaries_after_drift() {
        assert!(approx_eq(33.33 + 33.33 + 33.33, 100.0));
        assert!(approx_eq(50.005 + 50.005, 100.0));
        assert!(!approx_eq(99.98, 100.0));
        assert!(!approx_eq(100.02, 100.0));
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(33.333_333), 33.33);
        assert_eq!(round_cents(66.666_666), 66.67);
        assert_eq!(round_cents(30.0), 30.0);
    }

    #[test]
    fn rejects_non_finite_and_non_positive_amounts() {
        assert!(is_valid_amount(0.5));
        assert!(!is_valid_amount(0.0));
        assert!(!is_valid_amount(-3.0));
        assert!(!is_valid_amount(f64::NAN));
        assert!(!is_valid_amount(f64::INFINITY));
    }
}
