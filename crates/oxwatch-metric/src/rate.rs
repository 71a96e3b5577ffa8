use serde::{Deserialize, Serialize};

/// How a count metric is turned into a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateComputationMethod {
    /// Average of the datapoints within the period.
    #[default]
    Average,
    PerSecond,
    PerMinute,
    PerHour,
    PerDay,
}

impl RateComputationMethod {
    /// Seconds per rate unit, `None` for [`RateComputationMethod::Average`].
    pub fn seconds_per_unit(&self) -> Option<u32> {
        match self {
            Self::Average => None,
            Self::PerSecond => Some(1),
            Self::PerMinute => Some(60),
            Self::PerHour => Some(3600),
            Self::PerDay => Some(86400),
        }
    }

    pub(crate) fn label_unit(&self) -> &'static str {
        match self {
            Self::Average => "avg",
            Self::PerSecond => "s",
            Self::PerMinute => "m",
            Self::PerHour => "h",
            Self::PerDay => "d",
        }
    }
}

impl std::fmt::Display for RateComputationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Average => write!(f, "AVERAGE"),
            Self::PerSecond => write!(f, "PER_SECOND"),
            Self::PerMinute => write!(f, "PER_MINUTE"),
            Self::PerHour => write!(f, "PER_HOUR"),
            Self::PerDay => write!(f, "PER_DAY"),
        }
    }
}

impl std::str::FromStr for RateComputationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVERAGE" | "AVG" => Ok(Self::Average),
            "PER_SECOND" => Ok(Self::PerSecond),
            "PER_MINUTE" => Ok(Self::PerMinute),
            "PER_HOUR" => Ok(Self::PerHour),
            "PER_DAY" => Ok(Self::PerDay),
            _ => Err(format!("unknown rate computation method: {s}")),
        }
    }
}
