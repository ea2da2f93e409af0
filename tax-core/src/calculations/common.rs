//! Rounding and clamping helpers shared by the regime calculators and the
//! tax planner.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a rupee amount to paise (two decimal places), half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// // 4% cess on ₹12,512.50
/// assert_eq!(round_half_up(dec!(500.5000)), dec!(500.50));
/// assert_eq!(round_half_up(dec!(2812.4375)), dec!(2812.44));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-425000)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(775000)), dec!(775000));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Absolute difference between two amounts.
pub fn abs_diff(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    (a - b).abs()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(2700.004)), dec!(2700.00));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(2700.005)), dec!(2700.01));
    }

    #[test]
    fn round_half_up_preserves_whole_rupees() {
        assert_eq!(round_half_up(dec!(156000)), dec!(156000.00));
    }

    // =========================================================================
    // floor_at_zero tests
    // =========================================================================

    #[test]
    fn floor_at_zero_keeps_zero() {
        assert_eq!(floor_at_zero(dec!(0)), dec!(0));
    }

    #[test]
    fn floor_at_zero_clamps_small_negatives() {
        assert_eq!(floor_at_zero(dec!(-0.01)), dec!(0));
    }

    // =========================================================================
    // abs_diff tests
    // =========================================================================

    #[test]
    fn abs_diff_is_symmetric() {
        assert_eq!(abs_diff(dec!(70200), dec!(156000)), dec!(85800));
        assert_eq!(abs_diff(dec!(156000), dec!(70200)), dec!(85800));
    }

    #[test]
    fn abs_diff_of_equal_values_is_zero() {
        assert_eq!(abs_diff(dec!(62400), dec!(62400)), dec!(0));
    }
}
