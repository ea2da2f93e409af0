//! Text and JSON rendering of command results.

use std::io::{self, Write};

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::formatting::{format_inr, format_rate, slab_label};
use tax_core::tips::MonthlyTip;
use tax_core::{FinancialYear, Regime, RegimeComparison, SlabTable, TaxInput, TaxPlan, TaxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareReport {
    pub financial_year: FinancialYear,
    pub input: TaxInput,
    pub comparison: RegimeComparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub financial_year: FinancialYear,
    pub input: TaxInput,
    pub plan: TaxPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub employee_id: String,
    pub current_regime: Option<Regime>,
    pub comparison: RegimeComparison,
}

impl BatchRow {
    /// Filing under a known regime that is strictly more expensive.
    pub fn should_switch(&self) -> bool {
        self.current_regime
            .is_some_and(|current| current != self.comparison.recommendation.regime)
            && self.comparison.recommendation.savings > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub employees: usize,
    pub recommend_old: usize,
    pub recommend_new: usize,
    /// Employees whose declared regime is not the recommended one.
    pub switch_candidates: usize,
    /// Tax saved across the switch candidates if they all switched.
    pub switch_savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub financial_year: FinancialYear,
    pub rows: Vec<BatchRow>,
    pub summary: BatchSummary,
}

pub fn write_json<W: Write, T: Serialize>(
    out: &mut W,
    value: &T,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn write_result<W: Write>(
    out: &mut W,
    result: &TaxResult,
) -> io::Result<()> {
    writeln!(out, "{}", result.regime.label())?;
    writeln!(out, "  {:<22}{:>14}", "Taxable income", format_inr(result.taxable_income))?;
    if !result.slab_breakdown.is_empty() {
        writeln!(out, "  {:<22}{:>14}{:>7}{:>12}", "Slab", "Amount", "Rate", "Tax")?;
        for band in &result.slab_breakdown {
            writeln!(
                out,
                "  {:<22}{:>14}{:>7}{:>12}",
                band.band,
                format_inr(band.amount_in_band),
                format_rate(band.rate),
                format_inr(band.tax_for_band)
            )?;
        }
    }
    writeln!(out, "  {:<22}{:>14}", "Tax before cess", format_inr(result.tax_before_cess))?;
    if !result.rebate.is_zero() {
        writeln!(out, "  {:<22}{:>14}", "Rebate u/s 87A", format!("-{}", format_inr(result.rebate)))?;
    }
    writeln!(out, "  {:<22}{:>14}", "Health & edu. cess", format_inr(result.cess))?;
    writeln!(out, "  {:<22}{:>14}", "Total tax", format_inr(result.total_tax))
}

fn write_recommendation<W: Write>(
    out: &mut W,
    comparison: &RegimeComparison,
) -> io::Result<()> {
    let recommendation = comparison.recommendation;
    if recommendation.savings.is_zero() {
        writeln!(
            out,
            "Both regimes cost {}; {} recommended.",
            format_inr(comparison.old.total_tax),
            recommendation.regime.label()
        )
    } else {
        writeln!(
            out,
            "Save {} with {}!",
            format_inr(recommendation.savings),
            recommendation.regime.label()
        )
    }
}

pub fn write_comparison<W: Write>(
    out: &mut W,
    report: &CompareReport,
) -> io::Result<()> {
    writeln!(out, "Financial year {}", report.financial_year)?;
    writeln!(
        out,
        "{:<24}{:>14}",
        "Gross income",
        format_inr(report.input.annual_gross_income)
    )?;
    writeln!(
        out,
        "{:<24}{:>14}",
        "Deductions (old only)",
        format_inr(report.input.total_deductions())
    )?;
    writeln!(out)?;
    write_result(out, &report.comparison.old)?;
    writeln!(out)?;
    write_result(out, &report.comparison.new)?;
    writeln!(out)?;
    write_recommendation(out, &report.comparison)
}

pub fn write_plan<W: Write>(
    out: &mut W,
    report: &PlanReport,
) -> io::Result<()> {
    let plan = &report.plan;
    writeln!(out, "Financial year {}", report.financial_year)?;
    writeln!(
        out,
        "{:<24}{:>14}",
        format!("Current ({})", plan.current_regime.label()),
        format_inr(plan.current_tax)
    )?;
    writeln!(
        out,
        "{:<24}{:>14}",
        "Old Regime, caps filled",
        format_inr(plan.old_regime_optimized.total_tax)
    )?;
    writeln!(
        out,
        "{:<24}{:>14}",
        format!("Best ({})", plan.optimized_regime.label()),
        format_inr(plan.optimized_tax)
    )?;
    writeln!(out, "{:<24}{:>14}", "Potential savings", format_inr(plan.potential_savings))?;
    writeln!(out)?;

    if plan.suggestions.is_empty() {
        return writeln!(out, "No further savings found.");
    }
    for (idx, suggestion) in plan.suggestions.iter().enumerate() {
        writeln!(
            out,
            "{}. {} (save {})",
            idx + 1,
            suggestion.title,
            format_inr(suggestion.potential_saving)
        )?;
        writeln!(out, "   {}", suggestion.description)?;
    }
    Ok(())
}

pub fn write_batch<W: Write>(
    out: &mut W,
    report: &BatchReport,
) -> io::Result<()> {
    writeln!(out, "Financial year {}", report.financial_year)?;
    writeln!(
        out,
        "{:<12}{:>14}{:>14}{:>8}{:>14}{:>8}",
        "Employee", "Old", "New", "Best", "Savings", "Switch"
    )?;
    for row in &report.rows {
        writeln!(
            out,
            "{:<12}{:>14}{:>14}{:>8}{:>14}{:>8}",
            row.employee_id,
            format_inr(row.comparison.old.total_tax),
            format_inr(row.comparison.new.total_tax),
            row.comparison.recommendation.regime.as_str(),
            format_inr(row.comparison.recommendation.savings),
            if row.should_switch() { "yes" } else { "" }
        )?;
    }

    let summary = &report.summary;
    writeln!(out)?;
    writeln!(
        out,
        "{} employees: {} old, {} new",
        summary.employees, summary.recommend_old, summary.recommend_new
    )?;
    writeln!(
        out,
        "{} should switch regime, saving {} in total",
        summary.switch_candidates,
        format_inr(summary.switch_savings)
    )
}

pub fn write_tables<'a, W: Write>(
    out: &mut W,
    tables: impl IntoIterator<Item = &'a SlabTable>,
) -> io::Result<()> {
    for table in tables {
        let rules = table.rules();
        writeln!(out, "{} {}", table.financial_year(), table.regime().label())?;
        for slab in table.slabs() {
            writeln!(out, "  {:<22}{:>6}", slab_label(slab), format_rate(slab.rate))?;
        }
        if !rules.standard_deduction.is_zero() {
            writeln!(out, "  standard deduction {}", format_inr(rules.standard_deduction))?;
        }
        if let Some(ceiling) = rules.rebate_ceiling {
            writeln!(out, "  87A rebate up to {} taxable", format_inr(ceiling))?;
        }
        if let Some(limit) = rules.senior_basic_exemption {
            writeln!(out, "  senior citizen exemption {}", format_inr(limit))?;
        }
        writeln!(out, "  cess {}", format_rate(rules.cess_rate))?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_tip<W: Write>(
    out: &mut W,
    tip: &MonthlyTip,
) -> io::Result<()> {
    writeln!(out, "{}", tip.title)?;
    writeln!(out, "{}", tip.tip)
}
