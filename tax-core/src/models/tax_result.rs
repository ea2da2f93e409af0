use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// Tax attributable to one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandBreakdown {
    /// Display label, e.g. `₹2.5L - ₹5L` or `Above ₹10L`.
    pub band: String,
    pub amount_in_band: Decimal,
    pub rate: Decimal,
    pub tax_for_band: Decimal,
}

/// Outcome of one regime's computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub taxable_income: Decimal,
    pub slab_breakdown: Vec<BandBreakdown>,
    /// Sum of `tax_for_band`.
    pub tax_before_cess: Decimal,
    /// Section 87A rebate; zero unless the table carries a rebate ceiling.
    pub rebate: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
}

/// Which regime to pick and by how much it beats the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub regime: Regime,
    pub savings: Decimal,
}

/// Both regimes computed from the same input, plus the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old: TaxResult,
    pub new: TaxResult,
    pub recommendation: Recommendation,
}

impl RegimeComparison {
    pub fn result(
        &self,
        regime: Regime,
    ) -> &TaxResult {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }

    pub fn recommended(&self) -> &TaxResult {
        self.result(self.recommendation.regime)
    }
}
