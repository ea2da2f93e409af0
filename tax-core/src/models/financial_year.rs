use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An Indian financial year, April to March, written `2024-25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear {
    start_year: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinancialYearParseError {
    #[error("financial year '{0}' is not in the form YYYY-YY")]
    Malformed(String),

    #[error("financial year '{0}' does not span consecutive years")]
    NotConsecutive(String),
}

impl FinancialYear {
    pub const fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}-{:02}", self.start_year, self.end_year().rem_euclid(100))
    }
}

impl FromStr for FinancialYear {
    type Err = FinancialYearParseError;

    /// Accepts `2024-25`, `2024-2025`, or a bare start year `2024`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || FinancialYearParseError::Malformed(s.to_string());

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (start, Some(end)),
            None => (s, None),
        };
        if start.len() != 4 {
            return Err(malformed());
        }
        let start_year: i32 = start.parse().map_err(|_| malformed())?;

        if let Some(end) = end {
            let end_year: i32 = end.parse().map_err(|_| malformed())?;
            let consecutive = match end.len() {
                2 => end_year == (start_year + 1).rem_euclid(100),
                4 => end_year == start_year + 1,
                _ => return Err(malformed()),
            };
            if !consecutive {
                return Err(FinancialYearParseError::NotConsecutive(s.to_string()));
            }
        }

        Ok(Self::new(start_year))
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = FinancialYearParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FinancialYear> for String {
    fn from(value: FinancialYear) -> Self {
        value.to_string()
    }
}
