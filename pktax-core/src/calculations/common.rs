//! Shared arithmetic for the tax calculations.
//!
//! All money is carried as [`Decimal`] and rounded to paisa (two decimal
//! places) with half-up rounding at each aggregate step.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pktax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates a decimal value to two decimal places.
///
/// Used for ceilings: the result never exceeds `value`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use pktax_core::calculations::common::round_down;
///
/// assert_eq!(round_down(dec!(20000000.008)), dec!(20000000.00));
/// assert_eq!(round_down(dec!(123.459)), dec!(123.45));
/// ```
pub fn round_down(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Divides `numerator` by `denominator`, returning zero when the denominator
/// is zero.
///
/// A taxpayer with no taxable income has an effective rate of zero; that is
/// an answer, not a fault.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use pktax_core::calculations::common::ratio_or_zero;
///
/// assert_eq!(ratio_or_zero(dec!(25), dec!(100)), dec!(0.25));
/// assert_eq!(ratio_or_zero(dec!(0), dec!(0)), Decimal::ZERO);
/// ```
pub fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
