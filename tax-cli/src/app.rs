//! Command implementations, independent of argument parsing and output.

use rust_decimal::Decimal;
use tax_core::calculations::plan;
use tax_core::{FinancialYear, PlannerLimits, Regime, RegimeCalculator, TaxInput};
use tax_data::{EmployeeInput, SlabLoaderError, SlabTableLoader, SlabTableSet, TableSetError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::report::{BatchReport, BatchRow, BatchSummary, CompareReport, PlanReport};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Tables(#[from] SlabLoaderError),

    #[error(transparent)]
    Lookup(#[from] TableSetError),

    #[error("no financial year has both old and new regime tables")]
    NoCompleteYear,
}

/// Slab tables plus the year every command runs against.
#[derive(Debug)]
pub struct Session {
    tables: SlabTableSet,
    financial_year: FinancialYear,
    limits: PlannerLimits,
}

impl Session {
    /// Loads tables from the configured CSV files, or the built-in ones, and
    /// settles on a financial year that has both regimes.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let tables = match &config.slabs_path {
            Some(slabs_path) => {
                SlabTableLoader::load_files(slabs_path, config.rules_path.as_deref())?
            }
            None => {
                debug!("using built-in slab tables");
                SlabTableSet::builtin()
            }
        };
        Self::new(tables, config.financial_year, config.planner_limits())
    }

    pub fn new(
        tables: SlabTableSet,
        financial_year: Option<FinancialYear>,
        limits: PlannerLimits,
    ) -> Result<Self, AppError> {
        let financial_year = match financial_year {
            Some(fy) => {
                tables.calculator(fy)?;
                fy
            }
            None => tables
                .latest_complete_year()
                .ok_or(AppError::NoCompleteYear)?,
        };
        info!(%financial_year, tables = tables.len(), "session ready");

        Ok(Self {
            tables,
            financial_year,
            limits,
        })
    }

    pub fn financial_year(&self) -> FinancialYear {
        self.financial_year
    }

    pub fn tables(&self) -> &SlabTableSet {
        &self.tables
    }

    fn calculator(&self) -> Result<RegimeCalculator<'_>, AppError> {
        Ok(self.tables.calculator(self.financial_year)?)
    }

    pub fn compare(
        &self,
        input: TaxInput,
    ) -> Result<CompareReport, AppError> {
        let comparison = self.calculator()?.compare(&input);
        Ok(CompareReport {
            financial_year: self.financial_year,
            input,
            comparison,
        })
    }

    /// `hra_exemption` is the taxpayer's own exempt HRA, assumed claimed in
    /// the optimized old regime.
    pub fn plan(
        &self,
        input: TaxInput,
        current_regime: Regime,
        hra_exemption: Decimal,
    ) -> Result<PlanReport, AppError> {
        let limits = PlannerLimits {
            hra_exemption,
            ..self.limits.clone()
        };
        let plan = plan(&self.calculator()?, &input, current_regime, &limits);
        Ok(PlanReport {
            financial_year: self.financial_year,
            input,
            plan,
        })
    }

    pub fn batch(
        &self,
        employees: Vec<EmployeeInput>,
    ) -> Result<BatchReport, AppError> {
        let calculator = self.calculator()?;
        let mut summary = BatchSummary::default();

        let rows: Vec<BatchRow> = employees
            .into_iter()
            .map(|employee| BatchRow {
                comparison: calculator.compare(&employee.input),
                employee_id: employee.employee_id,
                current_regime: employee.current_regime,
            })
            .collect();

        for row in &rows {
            summary.employees += 1;
            match row.comparison.recommendation.regime {
                Regime::Old => summary.recommend_old += 1,
                Regime::New => summary.recommend_new += 1,
            }
            if row.should_switch() {
                summary.switch_candidates += 1;
                summary.switch_savings = summary
                    .switch_savings
                    .saturating_add(row.comparison.recommendation.savings);
            }
        }
        info!(
            employees = summary.employees,
            switch_candidates = summary.switch_candidates,
            "batch compared"
        );

        Ok(BatchReport {
            financial_year: self.financial_year,
            rows,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{RegimeRules, SlabTable, TaxSlab};

    use super::*;

    fn builtin_session() -> Session {
        Session::new(SlabTableSet::builtin(), None, PlannerLimits::default()).unwrap()
    }

    fn employee(
        id: &str,
        input: TaxInput,
        current_regime: Option<Regime>,
    ) -> EmployeeInput {
        EmployeeInput {
            employee_id: id.to_string(),
            input,
            current_regime,
        }
    }

    #[test]
    fn default_session_picks_builtin_year() {
        let session = builtin_session();

        assert_eq!(session.financial_year(), FinancialYear::new(2024));
        assert_eq!(session.tables().len(), 2);
    }

    #[test]
    fn requested_year_must_be_loaded() {
        let err = Session::new(
            SlabTableSet::builtin(),
            Some(FinancialYear::new(2030)),
            PlannerLimits::default(),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "no old regime slab table for financial year 2030-31"
        );
    }

    #[test]
    fn half_loaded_set_has_no_complete_year() {
        let mut tables = SlabTableSet::default();
        tables.insert(
            SlabTable::new(
                FinancialYear::new(2025),
                Regime::New,
                vec![TaxSlab::new(dec!(0), None, dec!(0.1))],
                RegimeRules::default(),
            )
            .unwrap(),
        );

        let err = Session::new(tables, None, PlannerLimits::default()).unwrap_err();

        assert!(matches!(err, AppError::NoCompleteYear));
    }

    #[test]
    fn compare_runs_worked_example() {
        let report = builtin_session()
            .compare(TaxInput {
                annual_gross_income: dec!(1200000),
                deduction_80c: dec!(150000),
                deduction_80d: dec!(25000),
                home_loan_interest: dec!(200000),
                other_deductions: dec!(50000),
                senior_citizen: false,
            })
            .unwrap();

        assert_eq!(report.comparison.old.total_tax, dec!(70200));
        assert_eq!(report.comparison.new.total_tax, dec!(93600));
        assert_eq!(report.comparison.recommendation.regime, Regime::Old);
    }

    #[test]
    fn plan_uses_session_limits() {
        let session = Session::new(
            SlabTableSet::builtin(),
            None,
            PlannerLimits {
                section_80c_cap: dec!(150000),
                section_80d_cap: dec!(0),
                hra_exemption: dec!(0),
            },
        )
        .unwrap();
        let input = TaxInput {
            deduction_80c: dec!(50000),
            ..TaxInput::new(dec!(1200000))
        };

        let report = session.plan(input, Regime::Old, dec!(0)).unwrap();

        assert!(
            report
                .plan
                .suggestions
                .iter()
                .all(|s| s.kind != tax_core::calculations::SuggestionKind::Section80D)
        );
    }

    #[test]
    fn batch_summarises_switch_candidates() {
        let session = builtin_session();
        let worked = TaxInput {
            annual_gross_income: dec!(1200000),
            deduction_80c: dec!(150000),
            deduction_80d: dec!(25000),
            home_loan_interest: dec!(200000),
            other_deductions: dec!(50000),
            senior_citizen: false,
        };

        let report = session
            .batch(vec![
                // Old is cheaper by 23,400 but files under new.
                employee("EMP001", worked, Some(Regime::New)),
                // New is cheaper by 85,800 and already files under new.
                employee("EMP002", TaxInput::new(dec!(1200000)), Some(Regime::New)),
                // New is cheaper but the regime is unknown.
                employee("EMP003", TaxInput::new(dec!(1500000)), None),
            ])
            .unwrap();

        assert_eq!(
            report.summary,
            BatchSummary {
                employees: 3,
                recommend_old: 1,
                recommend_new: 2,
                switch_candidates: 1,
                switch_savings: dec!(23400),
            }
        );
        assert_eq!(report.rows[2].employee_id, "EMP003");
    }

    #[test]
    fn plan_passes_hra_exemption_to_planner() {
        let report = builtin_session()
            .plan(TaxInput::new(dec!(1200000)), Regime::New, dec!(240000))
            .unwrap();

        assert_eq!(report.plan.old_regime_optimized.total_tax, dec!(72280));
        assert_eq!(report.plan.optimized_regime, Regime::Old);
    }

    #[test]
    fn batch_survives_deductions_near_decimal_max() {
        let session = builtin_session();
        let huge = TaxInput {
            deduction_80c: Decimal::MAX,
            home_loan_interest: Decimal::MAX,
            ..TaxInput::new(dec!(1200000))
        };

        let report = session
            .batch(vec![
                employee("EMP001", huge.clone(), Some(Regime::New)),
                employee("EMP002", huge, Some(Regime::New)),
                employee("EMP003", TaxInput::new(Decimal::MAX), Some(Regime::Old)),
            ])
            .unwrap();

        assert_eq!(report.rows[0].comparison.old.total_tax, dec!(0));
        assert_eq!(report.rows[0].comparison.recommendation.regime, Regime::Old);
        assert_eq!(report.summary.switch_candidates, 3);
        assert!(report.summary.switch_savings > dec!(0));
    }
}
