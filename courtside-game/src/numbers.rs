//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Ratio helper returning `fallback` when the denominator is not positive.
#[must_use]
pub fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() && denominator.is_finite() {
        numerator / denominator
    } else {
        fallback
    }
}

/// Signed score margin between two running totals.
#[must_use]
pub fn margin(mine: u32, theirs: u32) -> i32 {
    let mine = i64::from(mine);
    let theirs = i64::from(theirs);
    i32::try_from(mine - theirs).unwrap_or(if mine > theirs { i32::MAX } else { i32::MIN })
}
