//! Integer basis-point arithmetic with banker's rounding.
//!
//! All products use `u128` intermediates; a `u64` amount times a `u64` rate
//! cannot overflow before the division.

use crate::constants::BPS_PRECISION;

/// Compute `amount * bps / BPS_PRECISION`, rounded half-to-even.
///
/// Returns `None` only when the rounded result does not fit in a `u64`
/// (possible for `bps > BPS_PRECISION`).
///
/// # Examples
///
/// ```
/// use lumen_core::rounding::mul_bps_half_even;
///
/// assert_eq!(mul_bps_half_even(1000, 4_500), Some(450));
/// // 0.5 rounds to the even neighbour.
/// assert_eq!(mul_bps_half_even(1, 5_000), Some(0));
/// assert_eq!(mul_bps_half_even(3, 5_000), Some(2));
/// ```
pub fn mul_bps_half_even(amount: u64, bps: u64) -> Option<u64> {
    let precision = BPS_PRECISION as u128;
    let product = amount as u128 * bps as u128;
    let quotient = product / precision;
    let twice_remainder = (product % precision) * 2;

    let rounded = if twice_remainder > precision
        || (twice_remainder == precision && quotient % 2 == 1)
    {
        quotient + 1
    } else {
        quotient
    };

    u64::try_from(rounded).ok()
}

/// Convert a human percentage (`33.0`, `12.5`) to basis points.
///
/// Rejects NaN, infinities, negatives and anything above 100.
///
/// # Examples
///
/// ```
/// use lumen_core::rounding::percent_to_bps;
///
/// assert_eq!(percent_to_bps(33.0), Some(3_300));
/// assert_eq!(percent_to_bps(12.5), Some(1_250));
/// assert_eq!(percent_to_bps(-1.0), None);
/// assert_eq!(percent_to_bps(100.5), None);
/// ```
pub fn percent_to_bps(percent: f64) -> Option<u64> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return None;
    }
    Some((percent * 100.0).round() as u64)
}

/// Basis points as a display percentage.
pub fn bps_to_percent(bps: u64) -> f64 {
    bps as f64 / 100.0
}
