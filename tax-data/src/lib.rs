//! CSV data sources: versioned slab tables and batch employee inputs.

pub mod employee_loader;
pub mod slab_loader;
pub mod table_set;

pub use employee_loader::{EmployeeInput, EmployeeLoadError};
pub use slab_loader::{RegimeRuleRecord, SlabLoaderError, SlabRecord, SlabTableLoader};
pub use table_set::{SlabTableSet, TableSetError};
