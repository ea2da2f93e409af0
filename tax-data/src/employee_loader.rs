//! CSV loader for batch regime comparisons.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column | Required | Type | Notes |
//! |-----------------------|----------|---------|---------------------------------|
//! | `employee_id` | yes | string | |
//! | `annual_gross_income` | yes | decimal | |
//! | `deduction_80c` | no | decimal | empty → 0 |
//! | `deduction_80d` | no | decimal | empty → 0 |
//! | `home_loan_interest` | no | decimal | empty → 0 |
//! | `other_deductions` | no | decimal | empty → 0 |
//! | `senior_citizen` | no | bool | `true`/`false`, empty → false |
//! | `current_regime` | no | string | `old` or `new`, empty → unknown |
//!
//! Unlike form input, batch rows are strict: negative amounts and
//! unrecognised regimes are errors.
//!
//! ### Minimal example
//!
//! ```csv
//! employee_id,annual_gross_income
//! EMP001,1200000
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{Regime, TaxInput};
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    employee_id: String,
    annual_gross_income: Decimal,
    deduction_80c: Option<Decimal>,
    deduction_80d: Option<Decimal>,
    home_loan_interest: Option<Decimal>,
    other_deductions: Option<Decimal>,
    senior_citizen: Option<bool>,
    current_regime: Option<String>,
}

/// Errors that can occur while loading employee rows.
#[derive(Debug, Error)]
pub enum EmployeeLoadError {
    /// Bad structure, missing required column, or type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read employee file: {0}")]
    Io(#[from] std::io::Error),

    /// Row numbers are 1-based (header = row 0).
    #[error("negative {field} on row {row}")]
    NegativeAmount { field: &'static str, row: usize },

    #[error("unrecognised regime '{regime}' on row {row}")]
    InvalidRegime { regime: String, row: usize },
}

/// One employee to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInput {
    pub employee_id: String,
    pub input: TaxInput,
    pub current_regime: Option<Regime>,
}

fn non_negative(
    value: Option<Decimal>,
    field: &'static str,
    row: usize,
) -> Result<Decimal, EmployeeLoadError> {
    let value = value.unwrap_or(Decimal::ZERO);
    if value < Decimal::ZERO {
        return Err(EmployeeLoadError::NegativeAmount { field, row });
    }
    Ok(value)
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<EmployeeInput, EmployeeLoadError> {
    let current_regime = match row.current_regime.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(Regime::parse(value).ok_or_else(|| {
            EmployeeLoadError::InvalidRegime {
                regime: value.to_string(),
                row: row_number,
            }
        })?),
    };

    Ok(EmployeeInput {
        employee_id: row.employee_id,
        input: TaxInput {
            annual_gross_income: non_negative(
                Some(row.annual_gross_income),
                "annual_gross_income",
                row_number,
            )?,
            deduction_80c: non_negative(row.deduction_80c, "deduction_80c", row_number)?,
            deduction_80d: non_negative(row.deduction_80d, "deduction_80d", row_number)?,
            home_loan_interest: non_negative(
                row.home_loan_interest,
                "home_loan_interest",
                row_number,
            )?,
            other_deductions: non_negative(row.other_deductions, "other_deductions", row_number)?,
            senior_citizen: row.senior_citizen.unwrap_or(false),
        },
        current_regime,
    })
}

/// Parse CSV text into employee inputs, in file order.
///
/// # Errors
///
/// * [`EmployeeLoadError::Parse`] – structurally invalid CSV or a required
///   field cannot be deserialised.
/// * [`EmployeeLoadError::NegativeAmount`] / [`EmployeeLoadError::InvalidRegime`]
///   – a row fails validation.
pub fn load_from_str(input: &str) -> Result<Vec<EmployeeInput>, EmployeeLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<EmployeeInput>, EmployeeLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}
