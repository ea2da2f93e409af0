use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calculation request. All amounts are annual rupees and non-negative.
///
/// Build from raw form text with [`crate::form::TaxForm::to_input`], which
/// coerces and clamps every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub annual_gross_income: Decimal,

    // Old regime only. No statutory caps are applied here.
    pub deduction_80c: Decimal,
    pub deduction_80d: Decimal,
    pub home_loan_interest: Decimal,
    pub other_deductions: Decimal,

    #[serde(default)]
    pub senior_citizen: bool,
}

impl TaxInput {
    pub fn new(annual_gross_income: Decimal) -> Self {
        Self {
            annual_gross_income,
            ..Self::default()
        }
    }

    /// Sum of the four itemised deductions, saturating at [`Decimal::MAX`].
    pub fn total_deductions(&self) -> Decimal {
        self.deduction_80c
            .saturating_add(self.deduction_80d)
            .saturating_add(self.home_loan_interest)
            .saturating_add(self.other_deductions)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_deductions_sums_all_sections_without_caps() {
        let input = TaxInput {
            annual_gross_income: dec!(1200000),
            deduction_80c: dec!(400000),
            deduction_80d: dec!(25000),
            home_loan_interest: dec!(200000),
            other_deductions: dec!(50000),
            senior_citizen: false,
        };

        assert_eq!(input.total_deductions(), dec!(675000));
    }

    #[test]
    fn new_leaves_deductions_at_zero() {
        let input = TaxInput::new(dec!(500000));

        assert_eq!(input.total_deductions(), dec!(0));
        assert!(!input.senior_citizen);
    }

    #[test]
    fn total_deductions_saturates_instead_of_overflowing() {
        let input = TaxInput {
            deduction_80c: Decimal::MAX,
            deduction_80d: Decimal::MAX,
            home_loan_interest: dec!(200000),
            ..TaxInput::new(dec!(0))
        };

        assert_eq!(input.total_deductions(), Decimal::MAX);
    }
}
