//! Loads versioned slab tables from CSV.
//!
//! Two files describe a set of tables:
//!
//! `slabs.csv`, one row per slab:
//!
//! | Column | Required | Notes |
//! |--------|----------|-------|
//! | `financial_year` | yes | `2024-25` |
//! | `regime` | yes | `old` or `new` (case-insensitive) |
//! | `lower_bound` | yes | rupees |
//! | `upper_bound` | yes | rupees, empty for the open-ended top slab |
//! | `rate` | yes | fraction, `0.05` for 5 % |
//!
//! `regime_rules.csv` (optional), at most one row per year and regime:
//!
//! | Column | Required | Notes |
//! |--------|----------|-------|
//! | `financial_year` | yes | |
//! | `regime` | yes | |
//! | `standard_deduction` | no | empty → 0 |
//! | `rebate_ceiling` | no | Section 87A ceiling, empty → no rebate |
//! | `senior_basic_exemption` | no | empty → no senior relief |
//! | `cess_rate` | no | empty → 0.04 |

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{FinancialYear, Regime, RegimeRules, SlabTable, SlabTableError, TaxSlab};
use thiserror::Error;
use tracing::{debug, info};

use crate::table_set::SlabTableSet;

/// Errors that can occur when loading slab table data.
#[derive(Debug, Error)]
pub enum SlabLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised regime '{regime}' on row {row}")]
    InvalidRegime { regime: String, row: usize },

    #[error("invalid financial year '{value}' on row {row}")]
    InvalidFinancialYear { value: String, row: usize },

    #[error("duplicate rules for {regime} regime {financial_year}")]
    DuplicateRules {
        financial_year: FinancialYear,
        regime: Regime,
    },

    #[error("rules given for {regime} regime {financial_year} but no slabs")]
    RulesWithoutSlabs {
        financial_year: FinancialYear,
        regime: Regime,
    },

    #[error("invalid {regime} regime table for {financial_year}: {source}")]
    InvalidTable {
        financial_year: FinancialYear,
        regime: Regime,
        #[source]
        source: SlabTableError,
    },
}

impl From<csv::Error> for SlabLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of `slabs.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub financial_year: String,
    pub regime: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// A single row of `regime_rules.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegimeRuleRecord {
    pub financial_year: String,
    pub regime: String,
    pub standard_deduction: Option<Decimal>,
    pub rebate_ceiling: Option<Decimal>,
    pub senior_basic_exemption: Option<Decimal>,
    pub cess_rate: Option<Decimal>,
}

impl RegimeRuleRecord {
    fn to_rules(&self) -> RegimeRules {
        let defaults = RegimeRules::default();
        RegimeRules {
            standard_deduction: self
                .standard_deduction
                .unwrap_or(defaults.standard_deduction),
            rebate_ceiling: self.rebate_ceiling,
            senior_basic_exemption: self.senior_basic_exemption,
            cess_rate: self.cess_rate.unwrap_or(defaults.cess_rate),
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

type TableKey = (FinancialYear, Regime);

fn parse_key(
    financial_year: &str,
    regime: &str,
    row: usize,
) -> Result<TableKey, SlabLoaderError> {
    let fy = financial_year
        .parse::<FinancialYear>()
        .map_err(|_| SlabLoaderError::InvalidFinancialYear {
            value: financial_year.to_string(),
            row,
        })?;
    let regime = Regime::parse(regime).ok_or_else(|| SlabLoaderError::InvalidRegime {
        regime: regime.to_string(),
        row,
    })?;
    Ok((fy, regime))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, SlabLoaderError> {
    File::open(path).map_err(|source| SlabLoaderError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loader for slab tables from CSV files.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab rows. The reader can be a file or a byte slice.
    pub fn parse_slabs<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Parse regime rule rows.
    pub fn parse_rules<R: Read>(reader: R) -> Result<Vec<RegimeRuleRecord>, SlabLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: RegimeRuleRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Group slab rows by (financial year, regime), attach rules, and
    /// validate each resulting table.
    ///
    /// Slabs within a group are sorted by lower bound, so row order in the
    /// file does not matter. Groups without a rules row use
    /// [`RegimeRules::default`].
    pub fn build(
        slabs: &[SlabRecord],
        rules: &[RegimeRuleRecord],
    ) -> Result<SlabTableSet, SlabLoaderError> {
        let mut groups: BTreeMap<TableKey, Vec<TaxSlab>> = BTreeMap::new();
        for (idx, record) in slabs.iter().enumerate() {
            let key = parse_key(&record.financial_year, &record.regime, idx + 1)?;
            groups.entry(key).or_default().push(TaxSlab::new(
                record.lower_bound,
                record.upper_bound,
                record.rate,
            ));
        }

        let mut rules_by_key: BTreeMap<TableKey, RegimeRules> = BTreeMap::new();
        for (idx, record) in rules.iter().enumerate() {
            let (financial_year, regime) =
                parse_key(&record.financial_year, &record.regime, idx + 1)?;
            if !groups.contains_key(&(financial_year, regime)) {
                return Err(SlabLoaderError::RulesWithoutSlabs {
                    financial_year,
                    regime,
                });
            }
            if rules_by_key
                .insert((financial_year, regime), record.to_rules())
                .is_some()
            {
                return Err(SlabLoaderError::DuplicateRules {
                    financial_year,
                    regime,
                });
            }
        }

        let mut set = SlabTableSet::default();
        for ((financial_year, regime), mut group) in groups {
            group.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
            let rules = rules_by_key
                .remove(&(financial_year, regime))
                .unwrap_or_default();
            let table = SlabTable::new(financial_year, regime, group, rules).map_err(|source| {
                SlabLoaderError::InvalidTable {
                    financial_year,
                    regime,
                    source,
                }
            })?;
            debug!(%financial_year, %regime, slabs = table.slabs().len(), "built slab table");
            set.insert(table);
        }

        Ok(set)
    }

    /// Read `slabs_path` and, when given, `rules_path`, and build the set.
    pub fn load_files(
        slabs_path: &Path,
        rules_path: Option<&Path>,
    ) -> Result<SlabTableSet, SlabLoaderError> {
        let slabs = Self::parse_slabs(open(slabs_path)?)?;
        let rules = match rules_path {
            Some(path) => Self::parse_rules(open(path)?)?,
            None => Vec::new(),
        };

        let set = Self::build(&slabs, &rules)?;
        info!(
            path = %slabs_path.display(),
            tables = set.len(),
            "loaded slab tables"
        );
        Ok(set)
    }
}
