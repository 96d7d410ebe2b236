//! Common arithmetic helpers for pricing calculations.
//!
//! Every guarded division in the pricing engine goes through
//! [`ratio_or_zero`], and every value the engine writes goes through
//! [`round_half_up`]. Products that can leave the `Decimal` range are
//! checked and come back as `None`.

use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quotation_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(160.1398)), dec!(160.14));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `pct` percent of `amount`, with percentages as whole numbers
/// (`4.5` means 4.5%), or `None` when the product overflows.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use quotation_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(200), dec!(4.5)), Some(dec!(9)));
/// assert_eq!(percent_of(Decimal::MAX, dec!(200)), None);
/// ```
pub fn percent_of(
    amount: Decimal,
    pct: Decimal,
) -> Option<Decimal> {
    amount.checked_mul(pct)?.checked_div(HUNDRED)
}

/// Divides `numerator` by `denominator`, substituting zero for the whole
/// expression when the denominator is zero or the quotient overflows.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use quotation_core::calculations::common::ratio_or_zero;
///
/// assert_eq!(ratio_or_zero(dec!(10), dec!(4)), dec!(2.5));
/// assert_eq!(ratio_or_zero(dec!(10), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Converts a whole-number percentage into a fraction of one.
pub(crate) fn fraction(pct: Decimal) -> Decimal {
    pct / HUNDRED
}
