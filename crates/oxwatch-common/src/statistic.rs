use serde::{Deserialize, Serialize};

/// Aggregation applied to the datapoints of a metric within one period.
///
/// The string form is the spelling the monitoring backend expects.
///
/// # Examples
///
/// ```
/// use oxwatch_common::statistic::Statistic;
///
/// let stat: Statistic = "p99".parse().unwrap();
/// assert_eq!(stat, Statistic::P99);
/// assert_eq!(Statistic::Tm99Top.to_string(), "TM(99%:100%)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    #[serde(rename = "p50")]
    P50,
    #[serde(rename = "p70")]
    P70,
    #[serde(rename = "p90")]
    P90,
    #[serde(rename = "p95")]
    P95,
    #[serde(rename = "p99")]
    P99,
    #[serde(rename = "p99.9")]
    P999,
    #[serde(rename = "p99.99")]
    P9999,
    #[serde(rename = "p100")]
    P100,
    #[serde(rename = "tm50")]
    Tm50,
    #[serde(rename = "tm70")]
    Tm70,
    #[serde(rename = "tm90")]
    Tm90,
    #[serde(rename = "tm95")]
    Tm95,
    #[serde(rename = "tm99")]
    Tm99,
    #[serde(rename = "tm99.9")]
    Tm999,
    #[serde(rename = "tm99.99")]
    Tm9999,
    #[serde(rename = "TM(95%:100%)")]
    Tm95Top,
    #[serde(rename = "TM(99%:100%)")]
    Tm99Top,
    #[serde(rename = "TM(99.9%:100%)")]
    Tm999Top,
    #[serde(rename = "TM(99.99%:100%)")]
    Tm9999Top,
    #[serde(rename = "TM(1%:99%)")]
    Tm1To99,
    #[serde(rename = "TM(5%:95%)")]
    Tm5To95,
    #[serde(rename = "Minimum")]
    Minimum,
    #[serde(rename = "Maximum")]
    Maximum,
    #[serde(rename = "Sum")]
    Sum,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "SampleCount")]
    SampleCount,
}

const ALL: [Statistic; 26] = [
    Statistic::P50,
    Statistic::P70,
    Statistic::P90,
    Statistic::P95,
    Statistic::P99,
    Statistic::P999,
    Statistic::P9999,
    Statistic::P100,
    Statistic::Tm50,
    Statistic::Tm70,
    Statistic::Tm90,
    Statistic::Tm95,
    Statistic::Tm99,
    Statistic::Tm999,
    Statistic::Tm9999,
    Statistic::Tm95Top,
    Statistic::Tm99Top,
    Statistic::Tm999Top,
    Statistic::Tm9999Top,
    Statistic::Tm1To99,
    Statistic::Tm5To95,
    Statistic::Minimum,
    Statistic::Maximum,
    Statistic::Sum,
    Statistic::Average,
    Statistic::SampleCount,
];

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P50 => "p50",
            Self::P70 => "p70",
            Self::P90 => "p90",
            Self::P95 => "p95",
            Self::P99 => "p99",
            Self::P999 => "p99.9",
            Self::P9999 => "p99.99",
            Self::P100 => "p100",
            Self::Tm50 => "tm50",
            Self::Tm70 => "tm70",
            Self::Tm90 => "tm90",
            Self::Tm95 => "tm95",
            Self::Tm99 => "tm99",
            Self::Tm999 => "tm99.9",
            Self::Tm9999 => "tm99.99",
            Self::Tm95Top => "TM(95%:100%)",
            Self::Tm99Top => "TM(99%:100%)",
            Self::Tm999Top => "TM(99.9%:100%)",
            Self::Tm9999Top => "TM(99.99%:100%)",
            Self::Tm1To99 => "TM(1%:99%)",
            Self::Tm5To95 => "TM(5%:95%)",
            Self::Minimum => "Minimum",
            Self::Maximum => "Maximum",
            Self::Sum => "Sum",
            Self::Average => "Average",
            Self::SampleCount => "SampleCount",
        }
    }

    /// Percentile-like statistics are subject to low-sample-count evaluation rules.
    pub fn is_percentile(&self) -> bool {
        !matches!(
            self,
            Self::Minimum | Self::Maximum | Self::Sum | Self::Average | Self::SampleCount
        )
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .find(|stat| stat.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown statistic: {s}"))
    }
}
