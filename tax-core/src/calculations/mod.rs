//! Income tax calculations for the old and new regimes.
//!
//! [`progressive`] holds the single band-walking routine; [`regimes`] wraps it
//! with each regime's deduction and cess rules; [`recommend`] and [`planner`]
//! compare the results.

pub mod common;
pub mod planner;
pub mod progressive;
pub mod recommend;
pub mod regimes;

pub use planner::{PlannerLimits, Suggestion, SuggestionKind, TaxPlan, plan};
pub use progressive::{SlabWalk, apply_slabs};
pub use recommend::recommend;
pub use regimes::{RegimeCalculator, compute_new_regime, compute_old_regime};
