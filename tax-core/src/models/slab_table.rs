use std::borrow::Cow;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FinancialYear, Regime};

/// Health & Education Cess applied on top of the computed tax.
pub const HEALTH_AND_EDUCATION_CESS_RATE: Decimal = dec!(0.04);

/// A contiguous income range taxed at a single marginal rate.
///
/// `upper_bound` of `None` means the slab is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxSlab {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }
}

/// Regime-level rules applied around the slab walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    /// Flat amount subtracted from gross income before any other deduction.
    pub standard_deduction: Decimal,

    /// Section 87A: when taxable income is at or below this ceiling the whole
    /// pre-cess tax is rebated.
    pub rebate_ceiling: Option<Decimal>,

    /// Raised basic exemption limit for senior citizens.
    pub senior_basic_exemption: Option<Decimal>,

    pub cess_rate: Decimal,
}

impl Default for RegimeRules {
    fn default() -> Self {
        Self {
            standard_deduction: Decimal::ZERO,
            rebate_ceiling: None,
            senior_basic_exemption: None,
            cess_rate: HEALTH_AND_EDUCATION_CESS_RATE,
        }
    }
}

/// Errors raised when a slab table fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabTableError {
    #[error("slab table for {regime} regime {financial_year} has no slabs")]
    Empty {
        financial_year: FinancialYear,
        regime: Regime,
    },

    #[error("first slab must start at 0, got {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("slab {index} has upper bound {upper} not above its lower bound {lower}")]
    EmptyRange {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("slab {index} starts at {found} but the previous slab ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("slab {0} is open-ended but is not the last slab")]
    UnboundedBeforeEnd(usize),

    #[error("last slab must be open-ended, but ends at {0}")]
    LastSlabBounded(Decimal),

    #[error("slab {index} has rate {rate} outside 0..=1")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("cess rate {0} outside 0..=1")]
    InvalidCessRate(Decimal),

    #[error("standard deduction must be non-negative, got {0}")]
    NegativeStandardDeduction(Decimal),

    #[error("senior citizen exemption must be non-negative, got {0}")]
    NegativeSeniorExemption(Decimal),

    #[error("rebate ceiling must be non-negative, got {0}")]
    NegativeRebateCeiling(Decimal),

    #[error("expected a {expected} regime table, got {found}")]
    RegimeMismatch { expected: Regime, found: Regime },
}

/// An ordered, validated set of slabs for one regime in one financial year.
///
/// Slabs are contiguous, ascending, start at zero and end with an open-ended
/// slab, so every non-negative income falls into exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabTable {
    financial_year: FinancialYear,
    regime: Regime,
    slabs: Vec<TaxSlab>,
    rules: RegimeRules,
}

impl SlabTable {
    /// Builds a table after checking slab continuity and rule ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SlabTableError`] when the slabs are empty, do not start at
    /// zero, overlap or leave gaps, are bounded at the top, carry a rate
    /// outside `0..=1`, or when the rules hold negative amounts.
    pub fn new(
        financial_year: FinancialYear,
        regime: Regime,
        slabs: Vec<TaxSlab>,
        rules: RegimeRules,
    ) -> Result<Self, SlabTableError> {
        let first = slabs.first().ok_or(SlabTableError::Empty {
            financial_year,
            regime,
        })?;
        if !first.lower_bound.is_zero() {
            return Err(SlabTableError::DoesNotStartAtZero(first.lower_bound));
        }

        let last_index = slabs.len() - 1;
        for (index, slab) in slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(SlabTableError::InvalidRate {
                    index,
                    rate: slab.rate,
                });
            }

            match slab.upper_bound {
                Some(upper) if upper <= slab.lower_bound => {
                    return Err(SlabTableError::EmptyRange {
                        index,
                        lower: slab.lower_bound,
                        upper,
                    });
                }
                Some(upper) if index == last_index => {
                    return Err(SlabTableError::LastSlabBounded(upper));
                }
                Some(upper) => {
                    let next = &slabs[index + 1];
                    if next.lower_bound != upper {
                        return Err(SlabTableError::NotContiguous {
                            index: index + 1,
                            expected: upper,
                            found: next.lower_bound,
                        });
                    }
                }
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedBeforeEnd(index));
                }
                None => {}
            }
        }

        if rules.cess_rate < Decimal::ZERO || rules.cess_rate > Decimal::ONE {
            return Err(SlabTableError::InvalidCessRate(rules.cess_rate));
        }
        if rules.standard_deduction < Decimal::ZERO {
            return Err(SlabTableError::NegativeStandardDeduction(
                rules.standard_deduction,
            ));
        }
        if let Some(exemption) = rules.senior_basic_exemption {
            if exemption < Decimal::ZERO {
                return Err(SlabTableError::NegativeSeniorExemption(exemption));
            }
        }
        if let Some(ceiling) = rules.rebate_ceiling {
            if ceiling < Decimal::ZERO {
                return Err(SlabTableError::NegativeRebateCeiling(ceiling));
            }
        }

        Ok(Self {
            financial_year,
            regime,
            slabs,
            rules,
        })
    }

    /// FY 2024-25 old regime: 0 / 2.5L / 5L / 10L at 0 / 5 / 20 / 30 %.
    pub fn old_regime_fy2024_25() -> Self {
        Self {
            financial_year: FinancialYear::new(2024),
            regime: Regime::Old,
            slabs: vec![
                TaxSlab::new(dec!(0), Some(dec!(250000)), dec!(0)),
                TaxSlab::new(dec!(250000), Some(dec!(500000)), dec!(0.05)),
                TaxSlab::new(dec!(500000), Some(dec!(1000000)), dec!(0.20)),
                TaxSlab::new(dec!(1000000), None, dec!(0.30)),
            ],
            rules: RegimeRules::default(),
        }
    }

    /// FY 2024-25 new regime: 3L steps at 0 / 5 / 10 / 15 / 20 %, 30 % above 15L.
    pub fn new_regime_fy2024_25() -> Self {
        Self {
            financial_year: FinancialYear::new(2024),
            regime: Regime::New,
            slabs: vec![
                TaxSlab::new(dec!(0), Some(dec!(300000)), dec!(0)),
                TaxSlab::new(dec!(300000), Some(dec!(600000)), dec!(0.05)),
                TaxSlab::new(dec!(600000), Some(dec!(900000)), dec!(0.10)),
                TaxSlab::new(dec!(900000), Some(dec!(1200000)), dec!(0.15)),
                TaxSlab::new(dec!(1200000), Some(dec!(1500000)), dec!(0.20)),
                TaxSlab::new(dec!(1500000), None, dec!(0.30)),
            ],
            rules: RegimeRules::default(),
        }
    }

    pub fn financial_year(&self) -> FinancialYear {
        self.financial_year
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    pub fn rules(&self) -> &RegimeRules {
        &self.rules
    }

    /// Returns the slabs that apply to a taxpayer.
    ///
    /// For senior citizens with a configured exemption, everything below the
    /// exemption limit collapses into one zero-rate slab and the first taxed
    /// slab starts at the limit.
    pub fn effective_slabs(
        &self,
        senior_citizen: bool,
    ) -> Cow<'_, [TaxSlab]> {
        let limit = match self.rules.senior_basic_exemption {
            Some(limit) if senior_citizen && limit > Decimal::ZERO => limit,
            _ => return Cow::Borrowed(&self.slabs),
        };

        let mut slabs = vec![TaxSlab::new(Decimal::ZERO, Some(limit), Decimal::ZERO)];
        slabs.extend(
            self.slabs
                .iter()
                .filter(|slab| slab.upper_bound.is_none_or(|upper| upper > limit))
                .map(|slab| TaxSlab {
                    lower_bound: slab.lower_bound.max(limit),
                    ..slab.clone()
                }),
        );
        Cow::Owned(slabs)
    }
}
