//! Tax planning suggestions on top of a regime comparison.
//!
//! The planner answers two questions for a taxpayer who has already picked a
//! regime: would the other regime be cheaper, and how much old regime tax
//! would filling the Section 80C and 80D caps save?
//!
//! The "optimized" old regime result assumes both caps are fully used and
//! any HRA exemption is claimed; the optimized tax is the lower of that and
//! the new regime.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::floor_at_zero;
use crate::calculations::recommend::recommend;
use crate::calculations::regimes::RegimeCalculator;
use crate::formatting::format_inr;
use crate::models::{Regime, RegimeComparison, TaxInput, TaxResult};

/// Statutory caps used when suggesting further investments, plus the
/// taxpayer's annual HRA exemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerLimits {
    pub section_80c_cap: Decimal,
    pub section_80d_cap: Decimal,
    /// Exempt house rent allowance, claimable only under the old regime.
    #[serde(default)]
    pub hra_exemption: Decimal,
}

impl Default for PlannerLimits {
    fn default() -> Self {
        Self {
            section_80c_cap: dec!(150000),
            section_80d_cap: dec!(25000),
            hra_exemption: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    RegimeSwitch,
    Section80C,
    Section80D,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub potential_saving: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPlan {
    pub current_regime: Regime,
    pub current_tax: Decimal,
    pub comparison: RegimeComparison,
    /// Old regime with the 80C and 80D caps filled and HRA claimed.
    pub old_regime_optimized: TaxResult,
    pub optimized_regime: Regime,
    pub optimized_tax: Decimal,
    pub potential_savings: Decimal,
    /// Only suggestions with a positive saving, regime switch first.
    pub suggestions: Vec<Suggestion>,
}

/// Builds a plan for a taxpayer currently filing under `current_regime`.
pub fn plan(
    calculator: &RegimeCalculator<'_>,
    input: &TaxInput,
    current_regime: Regime,
    limits: &PlannerLimits,
) -> TaxPlan {
    let comparison = calculator.compare(input);
    let current_tax = comparison.result(current_regime).total_tax;

    let optimized_input = TaxInput {
        deduction_80c: input.deduction_80c.max(limits.section_80c_cap),
        deduction_80d: input.deduction_80d.max(limits.section_80d_cap),
        other_deductions: input
            .other_deductions
            .saturating_add(floor_at_zero(limits.hra_exemption)),
        ..input.clone()
    };
    let old_regime_optimized = calculator.old_regime(&optimized_input);

    let best = recommend(&old_regime_optimized, &comparison.new);
    let optimized_tax = match best.regime {
        Regime::Old => old_regime_optimized.total_tax,
        Regime::New => comparison.new.total_tax,
    };

    let mut suggestions = Vec::new();
    match current_regime {
        Regime::New => {
            let saving = current_tax - old_regime_optimized.total_tax;
            if saving > Decimal::ZERO {
                suggestions.push(Suggestion {
                    kind: SuggestionKind::RegimeSwitch,
                    title: "Consider switching to Old Regime".to_string(),
                    description: format!(
                        "With deductions of {}, the Old Regime saves more.",
                        format_inr(optimized_input.total_deductions())
                    ),
                    potential_saving: saving,
                });
            }
        }
        Regime::Old => {
            let saving = current_tax - comparison.new.total_tax;
            if saving > Decimal::ZERO {
                suggestions.push(Suggestion {
                    kind: SuggestionKind::RegimeSwitch,
                    title: "Consider switching to New Regime".to_string(),
                    description: "Lower slab rates outweigh your current deductions.".to_string(),
                    potential_saving: saving,
                });
            }

            let headroom_80c = floor_at_zero(limits.section_80c_cap - input.deduction_80c);
            if headroom_80c > Decimal::ZERO {
                let maxed = TaxInput {
                    deduction_80c: limits.section_80c_cap,
                    ..input.clone()
                };
                let saving = current_tax - calculator.old_regime(&maxed).total_tax;
                if saving > Decimal::ZERO {
                    suggestions.push(Suggestion {
                        kind: SuggestionKind::Section80C,
                        title: "Maximize Section 80C".to_string(),
                        description: format!(
                            "Invest a further {} in ELSS, PPF, or life insurance to reduce taxable income.",
                            format_inr(headroom_80c)
                        ),
                        potential_saving: saving,
                    });
                }
            }

            let headroom_80d = floor_at_zero(limits.section_80d_cap - input.deduction_80d);
            if headroom_80d > Decimal::ZERO {
                let maxed = TaxInput {
                    deduction_80d: limits.section_80d_cap,
                    ..input.clone()
                };
                let saving = current_tax - calculator.old_regime(&maxed).total_tax;
                if saving > Decimal::ZERO {
                    suggestions.push(Suggestion {
                        kind: SuggestionKind::Section80D,
                        title: "Claim Section 80D".to_string(),
                        description: format!(
                            "A further {} of health insurance premium is deductible.",
                            format_inr(headroom_80d)
                        ),
                        potential_saving: saving,
                    });
                }
            }
        }
    }

    let potential_savings = floor_at_zero(current_tax - optimized_tax);
    debug!(
        %current_regime,
        %current_tax,
        %optimized_tax,
        suggestions = suggestions.len(),
        "built tax plan"
    );

    TaxPlan {
        current_regime,
        current_tax,
        comparison,
        old_regime_optimized,
        optimized_regime: best.regime,
        optimized_tax,
        potential_savings,
        suggestions,
    }
}
