mod financial_year;
mod regime;
mod slab_table;
mod tax_input;
mod tax_result;

pub use financial_year::{FinancialYear, FinancialYearParseError};
pub use regime::Regime;
pub use slab_table::{
    HEALTH_AND_EDUCATION_CESS_RATE, RegimeRules, SlabTable, SlabTableError, TaxSlab,
};
pub use tax_input::TaxInput;
pub use tax_result::{BandBreakdown, Recommendation, RegimeComparison, TaxResult};
