//! `tax-regime.toml` configuration.
//!
//! Resolution order, highest priority first:
//! 1. command line flags ([`CliOverrides`])
//! 2. the config file (`--config`, else `tax-regime.toml` in the working
//!    directory when present)
//! 3. compiled defaults
//!
//! ```toml
//! financial_year = "2025-26"
//! slabs_path = "data/slabs.csv"
//! rules_path = "data/regime_rules.csv"
//! log_level = "debug"
//! log_file = "tax-regime.log"
//!
//! [planner]
//! section_80c_cap = 150000
//! section_80d_cap = 50000
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{FinancialYear, PlannerLimits};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "tax-regime.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

/// Deduction caps the planner fills when estimating savings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub section_80c_cap: Option<Decimal>,
    pub section_80d_cap: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Defaults to the latest year with both regimes loaded.
    pub financial_year: Option<FinancialYear>,
    /// Without this the built-in FY 2024-25 tables are used.
    pub slabs_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    /// An `EnvFilter` directive. `RUST_LOG` still wins.
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub planner: PlannerConfig,
}

/// Values taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub financial_year: Option<FinancialYear>,
    pub slabs_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `path`, or `tax-regime.toml` from the working directory when no
    /// path is given. Only an explicitly named file is required to exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config file");

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    /// Parse from a TOML string. Paths are left as written.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let caps = [
            ("planner.section_80c_cap", self.planner.section_80c_cap),
            ("planner.section_80d_cap", self.planner.section_80d_cap),
        ];
        for (field, cap) in caps {
            if cap.is_some_and(|cap| cap < Decimal::ZERO) {
                return Err(ConfigError::Validation {
                    field,
                    message: "must not be negative".to_string(),
                });
            }
        }
        if self.rules_path.is_some() && self.slabs_path.is_none() {
            return Err(ConfigError::Validation {
                field: "rules_path",
                message: "requires slabs_path".to_string(),
            });
        }
        Ok(())
    }

    pub fn apply_overrides(
        &mut self,
        cli: &CliOverrides,
    ) {
        if cli.financial_year.is_some() {
            self.financial_year = cli.financial_year;
        }
        if cli.slabs_path.is_some() {
            self.slabs_path = cli.slabs_path.clone();
            // Rules from the file belong to the file's slab data.
            self.rules_path = None;
        }
        if cli.rules_path.is_some() {
            self.rules_path = cli.rules_path.clone();
        }
        if cli.log_level.is_some() {
            self.log_level = cli.log_level.clone();
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
    }

    /// Planner caps with unset fields taken from [`PlannerLimits::default`].
    pub fn planner_limits(&self) -> PlannerLimits {
        let defaults = PlannerLimits::default();
        PlannerLimits {
            section_80c_cap: self
                .planner
                .section_80c_cap
                .unwrap_or(defaults.section_80c_cap),
            section_80d_cap: self
                .planner
                .section_80d_cap
                .unwrap_or(defaults.section_80d_cap),
            ..defaults
        }
    }

    fn resolve_paths(
        mut self,
        base: &Path,
    ) -> Self {
        for path in [&mut self.slabs_path, &mut self.rules_path, &mut self.log_file]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
