use oxwatch_common::annotation::Shading;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    GreaterThanOrEqualToThreshold,
    GreaterThanThreshold,
    LessThanThreshold,
    LessThanOrEqualToThreshold,
    LessThanLowerOrGreaterThanUpperThreshold,
    GreaterThanUpperThreshold,
    LessThanLowerThreshold,
}

impl FromStr for ComparisonOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GreaterThanOrEqualToThreshold" | "gte" => Ok(Self::GreaterThanOrEqualToThreshold),
            "GreaterThanThreshold" | "gt" => Ok(Self::GreaterThanThreshold),
            "LessThanThreshold" | "lt" => Ok(Self::LessThanThreshold),
            "LessThanOrEqualToThreshold" | "lte" => Ok(Self::LessThanOrEqualToThreshold),
            "LessThanLowerOrGreaterThanUpperThreshold" => {
                Ok(Self::LessThanLowerOrGreaterThanUpperThreshold)
            }
            "GreaterThanUpperThreshold" => Ok(Self::GreaterThanUpperThreshold),
            "LessThanLowerThreshold" => Ok(Self::LessThanLowerThreshold),
            _ => Err(format!("unknown comparison operator: {s}")),
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
            Self::GreaterThanThreshold => "GreaterThanThreshold",
            Self::LessThanThreshold => "LessThanThreshold",
            Self::LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
            Self::LessThanLowerOrGreaterThanUpperThreshold => {
                "LessThanLowerOrGreaterThanUpperThreshold"
            }
            Self::GreaterThanUpperThreshold => "GreaterThanUpperThreshold",
            Self::LessThanLowerThreshold => "LessThanLowerThreshold",
        };
        f.write_str(name)
    }
}

impl ComparisonOperator {
    /// Operators that compare against an anomaly-detection band rather
    /// than a static threshold.
    pub fn is_band_operator(&self) -> bool {
        matches!(
            self,
            Self::LessThanLowerOrGreaterThanUpperThreshold
                | Self::GreaterThanUpperThreshold
                | Self::LessThanLowerThreshold
        )
    }

    /// Side of the threshold line that is in alarm.
    pub fn alarming_range_shade(&self) -> Option<Shading> {
        match self {
            Self::GreaterThanOrEqualToThreshold
            | Self::GreaterThanThreshold
            | Self::GreaterThanUpperThreshold => Some(Shading::Above),
            Self::LessThanOrEqualToThreshold
            | Self::LessThanThreshold
            | Self::LessThanLowerThreshold => Some(Shading::Below),
            Self::LessThanLowerOrGreaterThanUpperThreshold => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::GreaterThanOrEqualToThreshold => "greater than or equal to",
            Self::GreaterThanThreshold => "greater than",
            Self::LessThanThreshold => "less than",
            Self::LessThanOrEqualToThreshold => "less than or equal to",
            Self::LessThanLowerOrGreaterThanUpperThreshold => "outside of the band",
            Self::GreaterThanUpperThreshold => "above the band",
            Self::LessThanLowerThreshold => "below the band",
        }
    }
}

/// How the backend treats periods without datapoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreatMissingData {
    Breaching,
    NotBreaching,
    Ignore,
    Missing,
}

impl FromStr for TreatMissingData {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breaching" => Ok(Self::Breaching),
            "notBreaching" | "not_breaching" => Ok(Self::NotBreaching),
            "ignore" => Ok(Self::Ignore),
            "missing" => Ok(Self::Missing),
            _ => Err(format!("unknown missing data treatment: {s}")),
        }
    }
}

impl std::fmt::Display for TreatMissingData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breaching => write!(f, "breaching"),
            Self::NotBreaching => write!(f, "notBreaching"),
            Self::Ignore => write!(f, "ignore"),
            Self::Missing => write!(f, "missing"),
        }
    }
}
