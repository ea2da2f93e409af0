//! Raw form input and its conversion into a [`TaxInput`].
//!
//! Every field is coerced like `parseFloat`: the longest numeric prefix is
//! used and anything unreadable becomes zero. Unlike `parseFloat`, commas
//! are first removed as thousands separators (`1,200,000` is 1200000, not 1)
//! and a leading `₹` is ignored. Negative amounts are then clamped to zero, so the calculators
//! never see a negative or missing value.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::TaxInput;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])?(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?").expect("valid numeric prefix regex")
});

/// Trims whitespace, drops a leading rupee sign and removes commas.
fn normalize_amount_input(s: &str) -> String {
    s.trim().trim_start_matches('₹').trim_start().replace(',', "")
}

/// Parses the numeric prefix of `s`, returning `None` when there is none or
/// it does not fit in a [`Decimal`].
fn parse_numeric_prefix(s: &str) -> Option<Decimal> {
    let caps = NUMERIC_PREFIX.captures(s)?;
    let int = caps.get(2).map_or("", |m| m.as_str());
    let frac = caps.get(3).map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let sign = caps.get(1).map_or("", |m| m.as_str()).trim_start_matches('+');
    let int = if int.is_empty() { "0" } else { int };
    let frac = if frac.is_empty() { "0" } else { frac };
    let mantissa = format!("{sign}{int}.{frac}");

    match caps.get(4) {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{}", exp.as_str())).ok(),
        None => Decimal::from_str(&mantissa).ok(),
    }
}

/// Reads an amount with `parseFloat` prefix semantics after stripping
/// commas.
///
/// Empty input is zero. Input with no numeric prefix is zero and logged.
/// Trailing garbage after a number is ignored and logged.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::form::parse_amount;
///
/// assert_eq!(parse_amount("12,00,000"), dec!(1200000));
/// assert_eq!(parse_amount("150000abc"), dec!(150000));
/// assert_eq!(parse_amount("1.5e5"), dec!(150000));
/// assert_eq!(parse_amount("abc"), dec!(0));
/// assert_eq!(parse_amount(""), dec!(0));
/// ```
pub fn parse_amount(s: &str) -> Decimal {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    match parse_numeric_prefix(&normalized) {
        Some(value) => value,
        None => {
            warn!(input = %s, "amount is not numeric, using 0");
            Decimal::ZERO
        }
    }
}

/// Form state as typed by the user. Every amount is kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxForm {
    pub annual_gross_income: String,
    pub deduction_80c: String,
    pub deduction_80d: String,
    pub home_loan_interest: String,
    pub other_deductions: String,
    #[serde(default)]
    pub senior_citizen: bool,
}

impl TaxForm {
    /// The calculator's opening values.
    pub fn new() -> Self {
        Self {
            annual_gross_income: "1200000".to_string(),
            deduction_80c: "150000".to_string(),
            deduction_80d: "25000".to_string(),
            home_loan_interest: "200000".to_string(),
            other_deductions: "50000".to_string(),
            senior_citizen: false,
        }
    }

    /// Single parse-and-clamp step from text to a validated [`TaxInput`].
    pub fn to_input(&self) -> TaxInput {
        TaxInput {
            annual_gross_income: coerce_amount("annual_gross_income", &self.annual_gross_income),
            deduction_80c: coerce_amount("deduction_80c", &self.deduction_80c),
            deduction_80d: coerce_amount("deduction_80d", &self.deduction_80d),
            home_loan_interest: coerce_amount("home_loan_interest", &self.home_loan_interest),
            other_deductions: coerce_amount("other_deductions", &self.other_deductions),
            senior_citizen: self.senior_citizen,
        }
    }
}

/// [`parse_amount`] followed by clamping negatives to zero. `field` names
/// the input in the warning.
pub fn coerce_amount(
    field: &'static str,
    raw: &str,
) -> Decimal {
    let value = parse_amount(raw);
    if value < Decimal::ZERO {
        warn!(field, input = %raw, "negative amount clamped to 0");
        return Decimal::ZERO;
    }
    value
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_plain_and_grouped_numbers() {
        assert_eq!(parse_amount("1200000"), dec!(1200000));
        assert_eq!(parse_amount("1,200,000"), dec!(1200000));
        assert_eq!(parse_amount("12,00,000.50"), dec!(1200000.50));
    }

    #[test]
    fn parse_amount_trims_whitespace_and_rupee_sign() {
        assert_eq!(parse_amount("  25000  "), dec!(25000));
        assert_eq!(parse_amount("₹ 25,000"), dec!(25000));
    }

    #[test]
    fn parse_amount_uses_leading_numeric_prefix() {
        assert_eq!(parse_amount("50000 rupees"), dec!(50000));
        assert_eq!(parse_amount("12.5.6"), dec!(12.5));
        assert_eq!(parse_amount("7e"), dec!(7));
    }

    #[test]
    fn parse_amount_handles_bare_fractions_and_signs() {
        assert_eq!(parse_amount(".5"), dec!(0.5));
        assert_eq!(parse_amount("5."), dec!(5));
        assert_eq!(parse_amount("+100"), dec!(100));
        assert_eq!(parse_amount("-100"), dec!(-100));
    }

    #[test]
    fn parse_amount_scientific_notation() {
        assert_eq!(parse_amount("1.2e6"), dec!(1200000));
        assert_eq!(parse_amount("25E-1"), dec!(2.5));
    }

    #[test]
    fn parse_amount_non_numeric_is_zero() {
        assert_eq!(parse_amount("abc"), dec!(0));
        assert_eq!(parse_amount("."), dec!(0));
        assert_eq!(parse_amount("-"), dec!(0));
        assert_eq!(parse_amount("   "), dec!(0));
    }

    #[test]
    fn parse_amount_overflow_is_zero() {
        assert_eq!(parse_amount("1e999"), dec!(0));
    }

    // =========================================================================
    // TaxForm tests
    // =========================================================================

    #[test]
    fn to_input_uses_form_defaults() {
        let input = TaxForm::new().to_input();

        assert_eq!(input.annual_gross_income, dec!(1200000));
        assert_eq!(input.total_deductions(), dec!(425000));
    }

    #[test]
    fn to_input_clamps_negatives_and_coerces_garbage() {
        let form = TaxForm {
            annual_gross_income: "-500000".to_string(),
            deduction_80c: "lots".to_string(),
            deduction_80d: "".to_string(),
            home_loan_interest: "-1".to_string(),
            other_deductions: "10,000".to_string(),
            senior_citizen: true,
        };

        let input = form.to_input();

        assert_eq!(
            input,
            TaxInput {
                annual_gross_income: dec!(0),
                deduction_80c: dec!(0),
                deduction_80d: dec!(0),
                home_loan_interest: dec!(0),
                other_deductions: dec!(10000),
                senior_citizen: true,
            }
        );
    }

    #[test]
    fn to_input_with_huge_deductions_still_compares() {
        let form = TaxForm {
            deduction_80c: "5e28".to_string(),
            deduction_80d: "5e28".to_string(),
            ..TaxForm::new()
        };
        let old = crate::SlabTable::old_regime_fy2024_25();
        let new = crate::SlabTable::new_regime_fy2024_25();
        let calculator = crate::calculations::RegimeCalculator::new(&old, &new).unwrap();

        let input = form.to_input();
        let comparison = calculator.compare(&input);

        assert_eq!(input.deduction_80c, dec!(50000000000000000000000000000));
        assert_eq!(input.total_deductions(), Decimal::MAX);
        assert_eq!(comparison.old.taxable_income, dec!(0));
        assert_eq!(comparison.old.total_tax, dec!(0));
        assert_eq!(comparison.new.total_tax, dec!(93600));
    }

    #[test]
    fn coerce_amount_clamps_negative() {
        assert_eq!(coerce_amount("hra", "-240000"), dec!(0));
        assert_eq!(coerce_amount("hra", "2,40,000"), dec!(240000));
    }
}
