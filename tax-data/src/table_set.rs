use std::collections::BTreeMap;

use tax_core::calculations::RegimeCalculator;
use tax_core::{FinancialYear, Regime, SlabTable, SlabTableError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableSetError {
    #[error("no {regime} regime slab table for financial year {financial_year}")]
    Missing {
        financial_year: FinancialYear,
        regime: Regime,
    },

    #[error(transparent)]
    Invalid(#[from] SlabTableError),
}

/// Slab tables keyed by financial year and regime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlabTableSet {
    tables: BTreeMap<(FinancialYear, Regime), SlabTable>,
}

impl SlabTableSet {
    /// The FY 2024-25 old and new regime tables compiled into the binary.
    pub fn builtin() -> Self {
        let mut set = Self::default();
        set.insert(SlabTable::old_regime_fy2024_25());
        set.insert(SlabTable::new_regime_fy2024_25());
        set
    }

    /// Adds a table, returning the one it replaced.
    pub fn insert(
        &mut self,
        table: SlabTable,
    ) -> Option<SlabTable> {
        self.tables
            .insert((table.financial_year(), table.regime()), table)
    }

    pub fn get(
        &self,
        financial_year: FinancialYear,
        regime: Regime,
    ) -> Result<&SlabTable, TableSetError> {
        self.tables
            .get(&(financial_year, regime))
            .ok_or(TableSetError::Missing {
                financial_year,
                regime,
            })
    }

    /// Pairs the year's old and new tables into a calculator.
    pub fn calculator(
        &self,
        financial_year: FinancialYear,
    ) -> Result<RegimeCalculator<'_>, TableSetError> {
        let old = self.get(financial_year, Regime::Old)?;
        let new = self.get(financial_year, Regime::New)?;
        Ok(RegimeCalculator::new(old, new)?)
    }

    /// Distinct financial years, ascending.
    pub fn financial_years(&self) -> Vec<FinancialYear> {
        let mut years: Vec<_> = self.tables.keys().map(|(fy, _)| *fy).collect();
        years.dedup();
        years
    }

    /// Most recent year that has both regimes.
    pub fn latest_complete_year(&self) -> Option<FinancialYear> {
        self.financial_years().into_iter().rev().find(|fy| {
            Regime::all()
                .iter()
                .all(|regime| self.tables.contains_key(&(*fy, *regime)))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlabTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
