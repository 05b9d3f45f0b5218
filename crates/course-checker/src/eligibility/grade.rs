use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Examination letter grade, ordered from `E` (rank 1) to `A` (rank 12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "E")]
    E,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A")]
    A,
}

impl Grade {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::E,
            Self::DMinus,
            Self::D,
            Self::DPlus,
            Self::CMinus,
            Self::C,
            Self::CPlus,
            Self::BMinus,
            Self::B,
            Self::BPlus,
            Self::AMinus,
            Self::A,
        ]
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::E => 1,
            Self::DMinus => 2,
            Self::D => 3,
            Self::DPlus => 4,
            Self::CMinus => 5,
            Self::C => 6,
            Self::CPlus => 7,
            Self::BMinus => 8,
            Self::B => 9,
            Self::BPlus => 10,
            Self::AMinus => 11,
            Self::A => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::E => "E",
            Self::DMinus => "D-",
            Self::D => "D",
            Self::DPlus => "D+",
            Self::CMinus => "C-",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::BMinus => "B-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::AMinus => "A-",
            Self::A => "A",
        }
    }

    /// Lenient parse: surrounding whitespace and letter case are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|grade| grade.label() == normalized)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized grade '{0}'")]
pub struct UnknownGrade(pub String);

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownGrade(value.to_string()))
    }
}

/// Rank of a raw grade token; anything unrecognized ranks 0, below every valid grade.
pub fn rank(raw: &str) -> u8 {
    Grade::parse(raw).map(Grade::rank).unwrap_or(0)
}

pub fn rank_opt(raw: Option<&str>) -> u8 {
    raw.map(rank).unwrap_or(0)
}
