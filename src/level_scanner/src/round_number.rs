//! Keeps matches that sit near a whole-dollar price.

use crate::{buffer::round_number_tolerance, match_set::MatchSet};

/// True when the fractional part of `price` is within the clamped tolerance
/// of `.00`, from above or below. Defined for non-negative prices.
pub fn is_near_whole(price: f64) -> bool {
    let buffer = round_number_tolerance(price);
    let decimal = price - price.floor();
    decimal <= buffer || (1.0 - decimal) <= buffer
}

/// Returns a new set holding only the entries whose price is near a whole number.
pub fn filter_to_round_numbers(matches: &MatchSet) -> MatchSet {
    matches
        .iter()
        .filter(|(_, price)| is_near_whole(*price))
        .collect()
}
