use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IATA global direction of travel. `ZZ` is the "any direction" wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalDirection {
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "AP")]
    AtlanticPacific,
    #[serde(rename = "AT")]
    Atlantic,
    #[serde(rename = "CT")]
    CircleTrip,
    #[serde(rename = "EH")]
    EasternHemisphere,
    #[serde(rename = "FE")]
    FarEast,
    #[serde(rename = "PA")]
    Pacific,
    #[serde(rename = "PN")]
    PolarNonstop,
    #[serde(rename = "PO")]
    Polar,
    #[serde(rename = "RU")]
    Russia,
    #[serde(rename = "SA")]
    SouthAtlantic,
    #[serde(rename = "TS")]
    TransSiberian,
    #[serde(rename = "WH")]
    WesternHemisphere,
    #[default]
    #[serde(rename = "ZZ")]
    Any,
}

impl GlobalDirection {
    pub const ALL: [GlobalDirection; 14] = [
        Self::Africa,
        Self::AtlanticPacific,
        Self::Atlantic,
        Self::CircleTrip,
        Self::EasternHemisphere,
        Self::FarEast,
        Self::Pacific,
        Self::PolarNonstop,
        Self::Polar,
        Self::Russia,
        Self::SouthAtlantic,
        Self::TransSiberian,
        Self::WesternHemisphere,
        Self::Any,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Africa => "AF",
            Self::AtlanticPacific => "AP",
            Self::Atlantic => "AT",
            Self::CircleTrip => "CT",
            Self::EasternHemisphere => "EH",
            Self::FarEast => "FE",
            Self::Pacific => "PA",
            Self::PolarNonstop => "PN",
            Self::Polar => "PO",
            Self::Russia => "RU",
            Self::SouthAtlantic => "SA",
            Self::TransSiberian => "TS",
            Self::WesternHemisphere => "WH",
            Self::Any => "ZZ",
        }
    }

    pub fn is_wildcard(self) -> bool {
        self == Self::Any
    }
}

impl fmt::Display for GlobalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown global direction '{0}'")]
pub struct UnknownGlobalDirection(pub String);

impl FromStr for GlobalDirection {
    type Err = UnknownGlobalDirection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::Any);
        }
        Self::ALL
            .into_iter()
            .find(|direction| direction.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownGlobalDirection(trimmed.to_string()))
    }
}
