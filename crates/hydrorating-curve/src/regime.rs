//! Flow regimes and Chezy coefficient formulas selectable by the operator.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Kind of flow the velocity formula is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowRegime {
    /// Clear water: `v = C·√(h·i)`.
    #[default]
    Water,
    /// Sediment-laden flow: `v = 4.5·h^0.67·i^0.17`.
    SedimentFlow,
    /// Mud-rock flow: `v = 3.75·h^0.5·i^0.17`.
    MudrockFlow,
}

impl FlowRegime {
    /// Return the numeric code used in survey spreadsheets (1, 2 or 3).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Water => 1,
            Self::SedimentFlow => 2,
            Self::MudrockFlow => 3,
        }
    }
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Water => "water",
            Self::SedimentFlow => "sediment_flow",
            Self::MudrockFlow => "mudrock_flow",
        })
    }
}

impl FromStr for FlowRegime {
    type Err = ConfigError;

    /// Accepts the regime name (case-insensitive) or its numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "water" => Ok(Self::Water),
            "2" | "sediment_flow" | "sediment" => Ok(Self::SedimentFlow),
            "3" | "mudrock_flow" | "mudrock" => Ok(Self::MudrockFlow),
            _ => Err(ConfigError::UnknownRegime { value: s.to_string() }),
        }
    }
}

/// Formula family for the Chezy coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChezyFormula {
    /// Pavlovsky for depths up to 3 m, Pavlovsky–Zheleznyakov above.
    #[default]
    DepthBanded,
    /// Manning: `C = h^(1/6) / n`.
    Manning,
    /// Zheleznyakov's closed form.
    Zheleznyakov,
}

impl fmt::Display for ChezyFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DepthBanded => "depth_banded",
            Self::Manning => "manning",
            Self::Zheleznyakov => "zheleznyakov",
        })
    }
}

impl FromStr for ChezyFormula {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "depth_banded" | "pavlovsky" => Ok(Self::DepthBanded),
            "manning" => Ok(Self::Manning),
            "zheleznyakov" => Ok(Self::Zheleznyakov),
            _ => Err(ConfigError::UnknownFormula { value: s.to_string() }),
        }
    }
}
