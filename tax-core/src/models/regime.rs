use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Old,
    New,
}

impl Regime {
    pub fn all() -> &'static [Regime] {
        &[Regime::Old, Regime::New]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Old => "Old Regime",
            Self::New => "New Regime",
        }
    }

    /// Case-insensitive; accepts `old`/`new`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Old => Self::New,
            Self::New => Self::Old,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_mixed_case_and_whitespace() {
        assert_eq!(Regime::parse(" Old "), Some(Regime::Old));
        assert_eq!(Regime::parse("NEW"), Some(Regime::New));
        assert_eq!(Regime::parse("legacy"), None);
    }

    #[test]
    fn other_flips_regime() {
        assert_eq!(Regime::Old.other(), Regime::New);
        assert_eq!(Regime::New.other(), Regime::Old);
    }
}
