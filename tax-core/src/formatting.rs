//! Display helpers for rupee amounts, slab labels and rates.
//!
//! Amounts use Indian digit grouping: the last three digits form one group
//! and every group above it has two digits (`₹12,34,567`).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::TaxSlab;

const LAKH: Decimal = dec!(100000);
const CRORE: Decimal = dec!(10000000);

/// Formats an amount as whole rupees with Indian grouping, e.g. `₹12,34,567`.
///
/// Rounds half away from zero. Negative amounts are prefixed with `-`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::formatting::format_inr;
///
/// assert_eq!(format_inr(dec!(1234567)), "₹12,34,567");
/// assert_eq!(format_inr(dec!(70200.50)), "₹70,201");
/// assert_eq!(format_inr(dec!(-1500)), "-₹1,500");
/// ```
pub fn format_inr(amount: Decimal) -> String {
    let rupees = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rupees.abs().normalize().to_string();
    let sign = if rupees.is_sign_negative() && !rupees.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}₹{}", group_indian(&digits))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

/// Compact label for a slab boundary: `₹2.5L`, `₹1.5Cr`, or `₹0`.
pub fn lakh_label(amount: Decimal) -> String {
    if amount.is_zero() {
        "₹0".to_string()
    } else if amount >= CRORE {
        format!("₹{}Cr", (amount / CRORE).normalize())
    } else {
        format!("₹{}L", (amount / LAKH).normalize())
    }
}

/// Label shown against a slab in a breakdown, e.g. `₹5L - ₹10L` or `Above ₹10L`.
pub fn slab_label(slab: &TaxSlab) -> String {
    match slab.upper_bound {
        Some(upper) => format!(
            "{} - {}",
            lakh_label(slab.lower_bound),
            lakh_label(upper)
        ),
        None => format!("Above {}", lakh_label(slab.lower_bound)),
    }
}

/// Formats a fractional rate as a percentage, `0.05` → `5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // format_inr tests
    // =========================================================================

    #[test]
    fn format_inr_small_amounts_have_no_separator() {
        assert_eq!(format_inr(dec!(0)), "₹0");
        assert_eq!(format_inr(dec!(999)), "₹999");
    }

    #[test]
    fn format_inr_groups_thousands_then_pairs() {
        assert_eq!(format_inr(dec!(1000)), "₹1,000");
        assert_eq!(format_inr(dec!(100000)), "₹1,00,000");
        assert_eq!(format_inr(dec!(1234567)), "₹12,34,567");
        assert_eq!(format_inr(dec!(123456789)), "₹12,34,56,789");
    }

    #[test]
    fn format_inr_rounds_to_whole_rupees() {
        assert_eq!(format_inr(dec!(85800.49)), "₹85,800");
        assert_eq!(format_inr(dec!(85800.50)), "₹85,801");
        assert_eq!(format_inr(dec!(100.00)), "₹100");
    }

    #[test]
    fn format_inr_negative_and_negative_zero() {
        assert_eq!(format_inr(dec!(-156000)), "-₹1,56,000");
        assert_eq!(format_inr(dec!(-0.4)), "₹0");
    }

    // =========================================================================
    // slab label tests
    // =========================================================================

    #[test]
    fn slab_label_bounded_slab() {
        let slab = TaxSlab::new(dec!(250000), Some(dec!(500000)), dec!(0.05));

        assert_eq!(slab_label(&slab), "₹2.5L - ₹5L");
    }

    #[test]
    fn slab_label_open_ended_slab() {
        let slab = TaxSlab::new(dec!(1500000), None, dec!(0.30));

        assert_eq!(slab_label(&slab), "Above ₹15L");
    }

    #[test]
    fn lakh_label_switches_to_crore() {
        assert_eq!(lakh_label(dec!(15000000)), "₹1.5Cr");
        assert_eq!(lakh_label(dec!(50000)), "₹0.5L");
    }

    #[test]
    fn format_rate_drops_trailing_zeros() {
        assert_eq!(format_rate(dec!(0.05)), "5%");
        assert_eq!(format_rate(dec!(0.30)), "30%");
        assert_eq!(format_rate(dec!(0.125)), "12.5%");
    }
}
