use crate::calculations::common::abs_diff;
use crate::models::{Recommendation, Regime, TaxResult};

/// Picks the regime with the lower total tax.
///
/// The new regime is recommended only when strictly cheaper; equal totals
/// resolve to the old regime. `savings` is the absolute difference.
pub fn recommend(
    old: &TaxResult,
    new: &TaxResult,
) -> Recommendation {
    let regime = if new.total_tax < old.total_tax {
        Regime::New
    } else {
        Regime::Old
    };

    Recommendation {
        regime,
        savings: abs_diff(old.total_tax, new.total_tax),
    }
}
