use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;

/// Competitor division. The stored spelling is the serde name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum StartClass {
    #[serde(rename = "Maennlich")]
    Maennlich,
    #[serde(rename = "Weiblich")]
    Weiblich,
    #[serde(rename = "Maennlich_Ue40")]
    MaennlichUe40,
    #[serde(rename = "Weiblich_Ue40")]
    WeiblichUe40,
}

impl StartClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maennlich => "Maennlich",
            Self::Weiblich => "Weiblich",
            Self::MaennlichUe40 => "Maennlich_Ue40",
            Self::WeiblichUe40 => "Weiblich_Ue40",
        }
    }

    /// Human readable label used by leaderboards and statistics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Maennlich => "Männlich",
            Self::Weiblich => "Weiblich",
            Self::MaennlichUe40 => "Männlich Ü40",
            Self::WeiblichUe40 => "Weiblich Ü40",
        }
    }

    pub fn all() -> &'static [StartClass] {
        &[
            Self::Maennlich,
            Self::Weiblich,
            Self::MaennlichUe40,
            Self::WeiblichUe40,
        ]
    }

    /// Every spelling that parses to this class, canonical first.
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            Self::Maennlich => &["Maennlich", "Männlich"],
            Self::Weiblich => &["Weiblich"],
            Self::MaennlichUe40 => &["Maennlich_Ue40", "Männlich_Ü40"],
            Self::WeiblichUe40 => &["Weiblich_Ue40", "Weiblich_Ü40"],
        }
    }

    fn parse_str(s: &str) -> Result<Self, StorageError> {
        let s = s.trim();
        match Self::all()
            .iter()
            .find(|class| class.spellings().iter().any(|spelling| *spelling == s))
        {
            Some(class) => Ok(*class),
            None => Err(StorageError::InvalidInput(format!(
                "Unknown start class: '{}'. Available: {}",
                s,
                Self::all()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl std::str::FromStr for StartClass {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for StartClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
