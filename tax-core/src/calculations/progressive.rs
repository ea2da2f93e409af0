//! The progressive band walker shared by both regimes.
//!
//! Given an ordered slab list and a taxable income, each slab whose lower
//! bound lies below the income contributes
//! `(min(income, upper) - lower) × rate`. Zero-rate slabs and slabs wholly
//! above the income produce no breakdown entry.

use rust_decimal::Decimal;

use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::formatting::slab_label;
use crate::models::{BandBreakdown, TaxSlab};

/// Result of walking a slab list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabWalk {
    /// The income actually walked, after flooring at zero.
    pub taxable_income: Decimal,
    pub breakdown: Vec<BandBreakdown>,
    /// Sum of every `tax_for_band`.
    pub tax: Decimal,
}

/// Applies progressive slabs to `taxable_income`.
///
/// Negative income is floored at zero, so neither regime can produce a
/// negative taxable income or tax. Each band's tax is rounded to paise.
///
/// Slabs must be ascending and contiguous; [`crate::SlabTable`] guarantees
/// this for validated tables.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::SlabTable;
/// use tax_core::calculations::apply_slabs;
///
/// let table = SlabTable::old_regime_fy2024_25();
/// let walk = apply_slabs(table.slabs(), dec!(775000));
///
/// assert_eq!(walk.breakdown.len(), 2);
/// assert_eq!(walk.tax, dec!(67500));
/// ```
pub fn apply_slabs(
    slabs: &[TaxSlab],
    taxable_income: Decimal,
) -> SlabWalk {
    let income = floor_at_zero(taxable_income);
    let mut breakdown = Vec::new();

    for slab in slabs {
        if slab.lower_bound >= income {
            break;
        }
        if slab.rate.is_zero() {
            continue;
        }

        let top = slab.upper_bound.map_or(income, |upper| income.min(upper));
        let amount_in_band = top - slab.lower_bound;
        breakdown.push(BandBreakdown {
            band: slab_label(slab),
            amount_in_band,
            rate: slab.rate,
            tax_for_band: round_half_up(amount_in_band * slab.rate),
        });
    }

    let tax = breakdown
        .iter()
        .fold(Decimal::ZERO, |sum, band| sum.saturating_add(band.tax_for_band));

    SlabWalk {
        taxable_income: income,
        breakdown,
        tax,
    }
}
