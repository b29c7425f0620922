//! Price tolerance ("buffer") rules.
//!
//! Two prices closer than the buffer count as the same level. The buffer is a
//! flat five cents up to $55 and roughly 0.1% of price above that.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance for prices at or below [`SCALING_THRESHOLD`].
pub const BASE_TOLERANCE: f64 = 0.05;

/// Prices strictly above this scale the tolerance with price.
pub const SCALING_THRESHOLD: f64 = 55.0;

/// Fraction of price used as the tolerance above the threshold.
pub const SCALING_FACTOR: f64 = 0.001;

/// Bounds applied to the tolerance when testing for round-number prices.
pub const ROUND_NUMBER_MIN: f64 = 0.10;
pub const ROUND_NUMBER_MAX: f64 = 0.35;

/// Rounds to two decimals on the exact binary value of `value`, with exact
/// halves going away from zero.
///
/// `(value * 100.0).round()` is not used: the product can land on a half cent
/// the stored value is short of (50.285 is stored as 50.28499...).
/// Non-finite input is returned unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    let cents = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.mantissa() as f64 / 10f64.powi(cents.scale() as i32)
}

/// Matching tolerance for a reference price.
///
/// Defined for non-negative finite prices only.
pub fn tolerance(reference_price: f64) -> f64 {
    if reference_price > SCALING_THRESHOLD {
        round_to_cents(reference_price * SCALING_FACTOR)
    } else {
        BASE_TOLERANCE
    }
}

/// [`tolerance`] clamped to `[ROUND_NUMBER_MIN, ROUND_NUMBER_MAX]`.
pub fn round_number_tolerance(price: f64) -> f64 {
    tolerance(price).clamp(ROUND_NUMBER_MIN, ROUND_NUMBER_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_below_threshold() {
        assert_eq!(tolerance(0.0), 0.05);
        assert_eq!(tolerance(50.0), 0.05);
        assert_eq!(tolerance(55.0), 0.05);
    }

    #[test]
    fn scales_above_threshold() {
        assert_eq!(tolerance(60.0), 0.06);
        assert_eq!(tolerance(100.0), 0.10);
        assert_eq!(tolerance(250.0), 0.25);
        assert_eq!(tolerance(1234.0), 1.23);
    }

    #[test]
    fn just_above_threshold_rounds_up() {
        assert_eq!(tolerance(55.01), 0.06);
    }

    #[test]
    fn round_number_tolerance_is_clamped() {
        assert_eq!(round_number_tolerance(20.0), 0.10);
        assert_eq!(round_number_tolerance(150.0), 0.15);
        assert_eq!(round_number_tolerance(900.0), 0.35);
    }

    #[test]
    fn cents_rounding() {
        assert_eq!(round_to_cents(10.514), 10.51);
        assert_eq!(round_to_cents(10.516), 10.52);
        assert_eq!(round_to_cents(10.5), 10.5);
    }

    #[test]
    fn cents_rounding_uses_the_stored_value() {
        // stored just below the half cent, although `x * 100.0` lands on it
        assert_eq!(round_to_cents(50.285), 50.28);
        assert_eq!(round_to_cents(1.045), 1.04);
        assert_eq!(round_to_cents(0.015), 0.01);
        // stored just above
        assert_eq!(round_to_cents(10.035), 10.04);
    }

    #[test]
    fn exact_half_cents_round_away_from_zero() {
        assert_eq!(round_to_cents(10.125), 10.13);
        assert_eq!(round_to_cents(-10.125), -10.13);
        assert_eq!(tolerance(125.0), 0.13);
        assert_eq!(tolerance(375.0), 0.38);
        assert_eq!(tolerance(625.0), 0.63);
        assert_eq!(tolerance(1125.0), 1.13);
    }

    #[test]
    fn non_finite_passes_through() {
        assert!(round_to_cents(f64::NAN).is_nan());
        assert_eq!(round_to_cents(f64::INFINITY), f64::INFINITY);
    }
}
