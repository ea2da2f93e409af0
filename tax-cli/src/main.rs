use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use tax_core::form::coerce_amount;
use tax_core::tips::monthly_tip;
use tax_core::{FinancialYear, Regime, TaxForm};
use tax_data::employee_loader;
use tax_cli::app::Session;
use tax_cli::config::{AppConfig, CliOverrides};
use tax_cli::logging;
use tax_cli::report::{self, OutputFormat};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare Indian income tax under the old and new regimes.
///
/// Uses the built-in FY 2024-25 slab tables unless `--slabs` (or
/// `slabs_path` in the config file) points at a slab CSV.
#[derive(Debug, Parser)]
#[command(name = "tax-regime", version)]
struct Cli {
    /// Config file. Defaults to `tax-regime.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Financial year, e.g. `2025-26`. Defaults to the latest loaded year.
    #[arg(long, global = true)]
    year: Option<FinancialYear>,

    /// Slab CSV (`financial_year,regime,lower_bound,upper_bound,rate`).
    #[arg(long, global = true)]
    slabs: Option<PathBuf>,

    /// Regime rules CSV to go with `--slabs`.
    #[arg(long, global = true, requires = "slabs")]
    rules: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter directive, e.g. `debug` or `warn,tax_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log records to this file as well as stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute both regimes for one taxpayer and recommend the cheaper.
    Compare(IncomeArgs),

    /// Suggest regime switches and deduction headroom.
    Plan {
        #[command(flatten)]
        income: IncomeArgs,

        /// Regime the taxpayer currently files under.
        #[arg(long, default_value = "new", value_parser = parse_regime)]
        current: Regime,

        /// Annual exempt HRA, claimed only in the optimized old regime.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        hra: String,
    },

    /// Compare every employee in a CSV file.
    Batch {
        /// Employee CSV (`employee_id,annual_gross_income,...`).
        path: PathBuf,
    },

    /// Print the loaded slab tables.
    Tables,

    /// Show the tax tip for a month (default: this month).
    Tip {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
}

/// Amounts are read like a form field: `12,00,000`, `₹1.5e5` and `50000abc`
/// are accepted, anything unreadable counts as 0.
#[derive(Debug, Args)]
struct IncomeArgs {
    #[arg(long, default_value = "1200000", allow_hyphen_values = true)]
    income: String,

    #[arg(long = "80c", default_value = "150000", allow_hyphen_values = true)]
    deduction_80c: String,

    #[arg(long = "80d", default_value = "25000", allow_hyphen_values = true)]
    deduction_80d: String,

    #[arg(long, default_value = "200000", allow_hyphen_values = true)]
    home_loan_interest: String,

    #[arg(long, default_value = "50000", allow_hyphen_values = true)]
    other_deductions: String,

    /// Aged 60 or over.
    #[arg(long)]
    senior: bool,
}

impl IncomeArgs {
    fn into_form(self) -> TaxForm {
        TaxForm {
            annual_gross_income: self.income,
            deduction_80c: self.deduction_80c,
            deduction_80d: self.deduction_80d,
            home_loan_interest: self.home_loan_interest,
            other_deductions: self.other_deductions,
            senior_citizen: self.senior,
        }
    }
}

fn parse_regime(s: &str) -> Result<Regime, String> {
    Regime::parse(s).ok_or_else(|| format!("expected `old` or `new`, got `{s}`"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply_overrides(&CliOverrides {
        financial_year: cli.year,
        slabs_path: cli.slabs,
        rules_path: cli.rules,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });

    logging::init(config.log_level.as_deref(), config.log_file.as_deref())
        .context("initialising logging")?;
    debug!(?config, "resolved configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let format = cli.format;

    // `tip` needs no slab tables.
    if let Command::Tip { month } = cli.command {
        let tip = monthly_tip(month.unwrap_or_else(|| Local::now().month()));
        return match format {
            OutputFormat::Text => report::write_tip(&mut out, &tip),
            OutputFormat::Json => report::write_json(&mut out, &tip),
        }
        .context("writing output");
    }

    let session = Session::from_config(&config).context("loading slab tables")?;

    match cli.command {
        Command::Compare(income) => {
            let report = session.compare(income.into_form().to_input())?;
            match format {
                OutputFormat::Text => report::write_comparison(&mut out, &report),
                OutputFormat::Json => report::write_json(&mut out, &report),
            }
        }
        Command::Plan {
            income,
            current,
            hra,
        } => {
            let hra_exemption = coerce_amount("hra", &hra);
            let report = session.plan(income.into_form().to_input(), current, hra_exemption)?;
            match format {
                OutputFormat::Text => report::write_plan(&mut out, &report),
                OutputFormat::Json => report::write_json(&mut out, &report),
            }
        }
        Command::Batch { path } => {
            let employees = employee_loader::load_from_file(&path)
                .with_context(|| format!("loading employees from {}", path.display()))?;
            let report = session.batch(employees)?;
            match format {
                OutputFormat::Text => report::write_batch(&mut out, &report),
                OutputFormat::Json => report::write_json(&mut out, &report),
            }
        }
        Command::Tables => match format {
            OutputFormat::Text => report::write_tables(&mut out, session.tables().iter()),
            OutputFormat::Json => {
                report::write_json(&mut out, &session.tables().iter().collect::<Vec<_>>())
            }
        },
        Command::Tip { .. } => Ok(()),
    }
    .context("writing output")?;

    out.flush().context("flushing output")
}
