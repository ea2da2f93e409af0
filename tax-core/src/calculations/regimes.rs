//! Old and new regime calculators.
//!
//! Both regimes run the same pipeline over their own slab table:
//!
//! | Step | Old regime | New regime |
//! |------|------------|------------|
//! | Taxable income | gross − standard deduction − itemised deductions, floored at 0 | gross − standard deduction, floored at 0 |
//! | Slab tax | [`apply_slabs`] | [`apply_slabs`] |
//! | Rebate (87A) | full pre-cess tax if taxable ≤ ceiling | same |
//! | Cess | cess rate × (tax − rebate) | same |
//! | Total | tax − rebate + cess | same |
//!
//! The built-in FY 2024-25 tables have no standard deduction and no rebate,
//! so the total is simply slab tax plus 4 % cess.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Regime, SlabTable, TaxInput};
//! use tax_core::calculations::RegimeCalculator;
//!
//! let old = SlabTable::old_regime_fy2024_25();
//! let new = SlabTable::new_regime_fy2024_25();
//! let calculator = RegimeCalculator::new(&old, &new).unwrap();
//!
//! let input = TaxInput {
//!     annual_gross_income: dec!(1200000),
//!     deduction_80c: dec!(150000),
//!     deduction_80d: dec!(25000),
//!     home_loan_interest: dec!(200000),
//!     other_deductions: dec!(50000),
//!     senior_citizen: false,
//! };
//!
//! let comparison = calculator.compare(&input);
//!
//! assert_eq!(comparison.old.total_tax, dec!(70200));
//! assert_eq!(comparison.new.total_tax, dec!(93600));
//! assert_eq!(comparison.recommendation.regime, Regime::Old);
//! assert_eq!(comparison.recommendation.savings, dec!(23400));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::calculations::progressive::apply_slabs;
use crate::calculations::recommend::recommend;
use crate::models::{Regime, RegimeComparison, SlabTable, SlabTableError, TaxInput, TaxResult};

/// Computes old regime tax for `income` less `deductions`.
///
/// `deductions` is the already-summed itemised total; no section caps apply.
pub fn compute_old_regime(
    table: &SlabTable,
    income: Decimal,
    deductions: Decimal,
) -> TaxResult {
    compute_regime(table, income, deductions, false)
}

/// Computes new regime tax. Itemised deductions are not accepted.
pub fn compute_new_regime(
    table: &SlabTable,
    income: Decimal,
) -> TaxResult {
    compute_regime(table, income, Decimal::ZERO, false)
}

fn compute_regime(
    table: &SlabTable,
    income: Decimal,
    deductions: Decimal,
    senior_citizen: bool,
) -> TaxResult {
    let rules = table.rules();
    let slabs = table.effective_slabs(senior_citizen);

    let walk = apply_slabs(
        &slabs,
        income
            .saturating_sub(rules.standard_deduction)
            .saturating_sub(deductions),
    );
    let tax_before_cess = walk.tax;

    let rebate = match rules.rebate_ceiling {
        Some(ceiling) if walk.taxable_income <= ceiling => tax_before_cess,
        _ => Decimal::ZERO,
    };
    let cess = round_half_up((tax_before_cess - rebate) * rules.cess_rate);
    let total_tax = (tax_before_cess - rebate).saturating_add(cess);

    debug!(
        regime = %table.regime(),
        financial_year = %table.financial_year(),
        taxable_income = %walk.taxable_income,
        %tax_before_cess,
        %rebate,
        %total_tax,
        "computed regime tax"
    );

    TaxResult {
        regime: table.regime(),
        taxable_income: walk.taxable_income,
        slab_breakdown: walk.breakdown,
        tax_before_cess,
        rebate,
        cess,
        total_tax,
    }
}

/// Pairs an old and a new regime table for the same financial year.
#[derive(Debug, Clone, Copy)]
pub struct RegimeCalculator<'a> {
    old: &'a SlabTable,
    new: &'a SlabTable,
}

impl<'a> RegimeCalculator<'a> {
    /// # Errors
    ///
    /// Returns [`SlabTableError::RegimeMismatch`] if either table belongs to
    /// the wrong regime.
    pub fn new(
        old: &'a SlabTable,
        new: &'a SlabTable,
    ) -> Result<Self, SlabTableError> {
        for (table, expected) in [(old, Regime::Old), (new, Regime::New)] {
            if table.regime() != expected {
                return Err(SlabTableError::RegimeMismatch {
                    expected,
                    found: table.regime(),
                });
            }
        }
        Ok(Self { old, new })
    }

    pub fn table(
        &self,
        regime: Regime,
    ) -> &'a SlabTable {
        match regime {
            Regime::Old => self.old,
            Regime::New => self.new,
        }
    }

    pub fn old_regime(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        compute_regime(
            self.old,
            input.annual_gross_income,
            input.total_deductions(),
            input.senior_citizen,
        )
    }

    pub fn new_regime(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        compute_regime(
            self.new,
            input.annual_gross_income,
            Decimal::ZERO,
            input.senior_citizen,
        )
    }

    pub fn regime(
        &self,
        regime: Regime,
        input: &TaxInput,
    ) -> TaxResult {
        match regime {
            Regime::Old => self.old_regime(input),
            Regime::New => self.new_regime(input),
        }
    }

    /// Computes both regimes independently and recommends the cheaper one.
    pub fn compare(
        &self,
        input: &TaxInput,
    ) -> RegimeComparison {
        let old = self.old_regime(input);
        let new = self.new_regime(input);
        let recommendation = recommend(&old, &new);

        RegimeComparison {
            old,
            new,
            recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{BandBreakdown, FinancialYear, RegimeRules};

    fn worked_example() -> TaxInput {
        TaxInput {
            annual_gross_income: dec!(1200000),
            deduction_80c: dec!(150000),
            deduction_80d: dec!(25000),
            home_loan_interest: dec!(200000),
            other_deductions: dec!(50000),
            senior_citizen: false,
        }
    }

    fn with_rules(
        base: SlabTable,
        rules: RegimeRules,
    ) -> SlabTable {
        SlabTable::new(
            base.financial_year(),
            base.regime(),
            base.slabs().to_vec(),
            rules,
        )
        .unwrap()
    }

    // =========================================================================
    // compute_old_regime tests
    // =========================================================================

    #[test]
    fn old_regime_zero_income() {
        let result = compute_old_regime(&SlabTable::old_regime_fy2024_25(), dec!(0), dec!(0));

        assert_eq!(result.taxable_income, dec!(0));
        assert!(result.slab_breakdown.is_empty());
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn old_regime_worked_example() {
        let input = worked_example();

        let result = compute_old_regime(
            &SlabTable::old_regime_fy2024_25(),
            input.annual_gross_income,
            input.total_deductions(),
        );

        assert_eq!(result.regime, Regime::Old);
        assert_eq!(result.taxable_income, dec!(775000));
        assert_eq!(
            result.slab_breakdown,
            vec![
                BandBreakdown {
                    band: "₹2.5L - ₹5L".to_string(),
                    amount_in_band: dec!(250000),
                    rate: dec!(0.05),
                    tax_for_band: dec!(12500),
                },
                BandBreakdown {
                    band: "₹5L - ₹10L".to_string(),
                    amount_in_band: dec!(275000),
                    rate: dec!(0.20),
                    tax_for_band: dec!(55000),
                },
            ]
        );
        assert_eq!(result.tax_before_cess, dec!(67500));
        assert_eq!(result.rebate, dec!(0));
        assert_eq!(result.cess, dec!(2700));
        assert_eq!(result.total_tax, dec!(70200));
    }

    #[test]
    fn old_regime_deductions_exceeding_income_floor_at_zero() {
        let result = compute_old_regime(
            &SlabTable::old_regime_fy2024_25(),
            dec!(300000),
            dec!(500000),
        );

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn old_regime_top_band() {
        let result = compute_old_regime(
            &SlabTable::old_regime_fy2024_25(),
            dec!(1500000),
            dec!(0),
        );

        // 12,500 + 1,00,000 + 1,50,000
        assert_eq!(result.tax_before_cess, dec!(262500));
        assert_eq!(result.cess, dec!(10500));
        assert_eq!(result.total_tax, dec!(273000));
        assert_eq!(result.slab_breakdown.last().unwrap().band, "Above ₹10L");
    }

    // =========================================================================
    // compute_new_regime tests
    // =========================================================================

    #[test]
    fn new_regime_worked_example() {
        let result = compute_new_regime(&SlabTable::new_regime_fy2024_25(), dec!(1200000));

        assert_eq!(result.regime, Regime::New);
        assert_eq!(result.taxable_income, dec!(1200000));
        let taxes: Vec<_> = result
            .slab_breakdown
            .iter()
            .map(|band| (band.amount_in_band, band.tax_for_band))
            .collect();
        assert_eq!(
            taxes,
            vec![
                (dec!(300000), dec!(15000)),
                (dec!(300000), dec!(30000)),
                (dec!(300000), dec!(45000)),
            ]
        );
        assert_eq!(result.tax_before_cess, dec!(90000));
        assert_eq!(result.cess, dec!(3600));
        assert_eq!(result.total_tax, dec!(93600));
    }

    #[test]
    fn new_regime_floors_negative_income() {
        let result = compute_new_regime(&SlabTable::new_regime_fy2024_25(), dec!(-100000));

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn new_regime_ignores_deductions_on_input() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();

        let with_deductions = calculator.new_regime(&worked_example());
        let without = calculator.new_regime(&TaxInput::new(dec!(1200000)));

        assert_eq!(with_deductions, without);
    }

    // =========================================================================
    // regime rule tests
    // =========================================================================

    #[test]
    fn standard_deduction_reduces_taxable_income() {
        let table = with_rules(
            SlabTable::new_regime_fy2024_25(),
            RegimeRules {
                standard_deduction: dec!(75000),
                ..RegimeRules::default()
            },
        );

        let result = compute_new_regime(&table, dec!(1200000));

        assert_eq!(result.taxable_income, dec!(1125000));
        // 15,000 + 30,000 + 33,750
        assert_eq!(result.tax_before_cess, dec!(78750));
    }

    #[test]
    fn rebate_wipes_tax_at_or_below_ceiling() {
        let table = with_rules(
            SlabTable::new_regime_fy2024_25(),
            RegimeRules {
                rebate_ceiling: Some(dec!(700000)),
                ..RegimeRules::default()
            },
        );

        let result = compute_new_regime(&table, dec!(700000));

        assert_eq!(result.tax_before_cess, dec!(25000));
        assert_eq!(result.rebate, dec!(25000));
        assert_eq!(result.cess, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn rebate_does_not_apply_above_ceiling() {
        let table = with_rules(
            SlabTable::new_regime_fy2024_25(),
            RegimeRules {
                rebate_ceiling: Some(dec!(700000)),
                ..RegimeRules::default()
            },
        );

        let result = compute_new_regime(&table, dec!(700001));

        assert_eq!(result.rebate, dec!(0));
        assert_eq!(result.tax_before_cess, dec!(25000.10));
        assert_eq!(result.total_tax, dec!(26000.10));
    }

    #[test]
    fn senior_citizen_gets_raised_exemption() {
        let old = with_rules(
            SlabTable::old_regime_fy2024_25(),
            RegimeRules {
                senior_basic_exemption: Some(dec!(300000)),
                ..RegimeRules::default()
            },
        );
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();
        let senior = TaxInput {
            senior_citizen: true,
            ..TaxInput::new(dec!(500000))
        };

        let result = calculator.old_regime(&senior);

        assert_eq!(result.slab_breakdown[0].band, "₹3L - ₹5L");
        assert_eq!(result.tax_before_cess, dec!(10000));
        assert_eq!(
            calculator.old_regime(&TaxInput::new(dec!(500000))).tax_before_cess,
            dec!(12500)
        );
    }

    // =========================================================================
    // RegimeCalculator tests
    // =========================================================================

    #[test]
    fn calculator_rejects_swapped_tables() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();

        let result = RegimeCalculator::new(&new, &old);

        assert_eq!(
            result.err(),
            Some(SlabTableError::RegimeMismatch {
                expected: Regime::Old,
                found: Regime::New,
            })
        );
    }

    #[test]
    fn compare_zero_income_yields_zero_for_both() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();

        let comparison = calculator.compare(&TaxInput::default());

        for result in [&comparison.old, &comparison.new] {
            assert_eq!(result.taxable_income, dec!(0));
            assert_eq!(result.total_tax, dec!(0));
            assert!(result.slab_breakdown.is_empty());
        }
        assert_eq!(comparison.recommendation.regime, Regime::Old);
        assert_eq!(comparison.recommendation.savings, dec!(0));
    }

    #[test]
    fn compare_worked_example_recommends_old() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();

        let comparison = calculator.compare(&worked_example());

        assert_eq!(comparison.old.total_tax, dec!(70200));
        assert_eq!(comparison.new.total_tax, dec!(93600));
        assert_eq!(comparison.recommendation.regime, Regime::Old);
        assert_eq!(comparison.recommendation.savings, dec!(23400));
        assert_eq!(comparison.recommended().total_tax, dec!(70200));
    }

    #[test]
    fn compare_without_deductions_recommends_new() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();

        let comparison = calculator.compare(&TaxInput::new(dec!(1200000)));

        // Old: 12,500 + 1,00,000 + 60,000 = 1,72,500 + cess 6,900
        assert_eq!(comparison.old.total_tax, dec!(179400));
        assert_eq!(comparison.recommendation.regime, Regime::New);
        assert_eq!(comparison.recommendation.savings, dec!(85800));
    }

    #[test]
    fn compare_tie_prefers_old() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();
        // New on 10L: 15,000 + 30,000 + 15,000 = 60,000.
        // Old on 7.375L: 12,500 + 47,500 = 60,000.
        let input = TaxInput {
            other_deductions: dec!(262500),
            ..TaxInput::new(dec!(1000000))
        };

        let comparison = calculator.compare(&input);

        assert_eq!(comparison.old.total_tax, dec!(62400));
        assert_eq!(comparison.new.total_tax, dec!(62400));
        assert_eq!(comparison.recommendation.regime, Regime::Old);
        assert_eq!(comparison.recommendation.savings, dec!(0));
    }

    #[test]
    fn compare_is_idempotent() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();
        let input = worked_example();

        assert_eq!(calculator.compare(&input), calculator.compare(&input));
    }

    #[test]
    fn table_lookup_matches_regime() {
        let old = SlabTable::old_regime_fy2024_25();
        let new = SlabTable::new_regime_fy2024_25();
        let calculator = RegimeCalculator::new(&old, &new).unwrap();

        assert_eq!(calculator.table(Regime::Old).regime(), Regime::Old);
        assert_eq!(calculator.table(Regime::New).financial_year(), FinancialYear::new(2024));
    }
}
