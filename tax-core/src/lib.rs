//! Indian personal income tax: old vs new regime slab computation.

pub mod calculations;
pub mod form;
pub mod formatting;
pub mod models;
pub mod tips;

pub use calculations::{PlannerLimits, RegimeCalculator, TaxPlan};
pub use form::TaxForm;
pub use models::*;
