use super::join_suffix;
use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::{CustomAlarmThreshold, DurationThreshold, LatencyThreshold};
use oxwatch_common::error::Result;
use oxwatch_common::statistic::Statistic;
use oxwatch_metric::MetricReference;
use serde::{Deserialize, Serialize};

const AVERAGE_LABEL_SUFFIX: &str = " (avg: ${AVG})";

/// Statistic a latency (or duration) alarm is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LatencyType {
    P50,
    P70,
    P90,
    P95,
    P99,
    P999,
    P9999,
    P100,
    Tm50,
    Tm70,
    Tm90,
    Tm95,
    Tm99,
    Tm999,
    Tm9999,
    Tm95Top,
    Tm99Top,
    Tm999Top,
    Tm9999Top,
    Average,
    Max,
}

impl LatencyType {
    pub const ALL: [LatencyType; 21] = [
        Self::P50,
        Self::P70,
        Self::P90,
        Self::P95,
        Self::P99,
        Self::P999,
        Self::P9999,
        Self::P100,
        Self::Tm50,
        Self::Tm70,
        Self::Tm90,
        Self::Tm95,
        Self::Tm99,
        Self::Tm999,
        Self::Tm9999,
        Self::Tm95Top,
        Self::Tm99Top,
        Self::Tm999Top,
        Self::Tm9999Top,
        Self::Average,
        Self::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P50 => "P50",
            Self::P70 => "P70",
            Self::P90 => "P90",
            Self::P95 => "P95",
            Self::P99 => "P99",
            Self::P999 => "P999",
            Self::P9999 => "P9999",
            Self::P100 => "P100",
            Self::Tm50 => "TM50",
            Self::Tm70 => "TM70",
            Self::Tm90 => "TM90",
            Self::Tm95 => "TM95",
            Self::Tm99 => "TM99",
            Self::Tm999 => "TM999",
            Self::Tm9999 => "TM9999",
            Self::Tm95Top => "TM(95%:100%)",
            Self::Tm99Top => "TM(99%:100%)",
            Self::Tm999Top => "TM(99.9%:100%)",
            Self::Tm9999Top => "TM(99.99%:100%)",
            Self::Average => "Average",
            Self::Max => "Maximum",
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            Self::P50 => Statistic::P50,
            Self::P70 => Statistic::P70,
            Self::P90 => Statistic::P90,
            Self::P95 => Statistic::P95,
            Self::P99 => Statistic::P99,
            Self::P999 => Statistic::P999,
            Self::P9999 => Statistic::P9999,
            Self::P100 => Statistic::P100,
            Self::Tm50 => Statistic::Tm50,
            Self::Tm70 => Statistic::Tm70,
            Self::Tm90 => Statistic::Tm90,
            Self::Tm95 => Statistic::Tm95,
            Self::Tm99 => Statistic::Tm99,
            Self::Tm999 => Statistic::Tm999,
            Self::Tm9999 => Statistic::Tm9999,
            Self::Tm95Top => Statistic::Tm95Top,
            Self::Tm99Top => Statistic::Tm99Top,
            Self::Tm999Top => Statistic::Tm999Top,
            Self::Tm9999Top => Statistic::Tm9999Top,
            Self::Average => Statistic::Average,
            Self::Max => Statistic::Maximum,
        }
    }

    /// Suffix for expression ids, e.g. `latencyP99` -> `99`.
    pub fn expression_id(&self) -> &'static str {
        match self {
            Self::P50 => "50",
            Self::P70 => "70",
            Self::P90 => "90",
            Self::P95 => "95",
            Self::P99 => "99",
            Self::P999 => "999",
            Self::P9999 => "9999",
            Self::P100 => "100",
            Self::Average => "Avg",
            Self::Max => "Max",
            other => other.as_str(),
        }
    }

    /// Series label with the average appended, using decimal percentiles.
    pub fn label(&self) -> String {
        match self {
            Self::P999 | Self::Tm999 => {
                format!("{}{AVERAGE_LABEL_SUFFIX}", self.as_str().replace("999", "99.9"))
            }
            Self::P9999 | Self::Tm9999 => {
                format!("{}{AVERAGE_LABEL_SUFFIX}", self.as_str().replace("9999", "99.99"))
            }
            Self::Average => "Average".to_string(),
            Self::Max => "Maximum".to_string(),
            other => format!("{}{AVERAGE_LABEL_SUFFIX}", other.as_str()),
        }
    }
}

impl std::fmt::Display for LatencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latency, integration latency and duration alarms, all "greater than".
#[derive(Debug, Clone, Copy)]
pub struct LatencyAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> LatencyAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_latency_alarm(
        &self,
        metric: &MetricReference,
        latency_type: LatencyType,
        props: &LatencyThreshold,
        disambiguator: &str,
        additional_suffix: Option<&str>,
    ) -> Result<AlarmDefinition> {
        let suffix = join_suffix(&["Latency", latency_type.as_str()], additional_suffix);
        self.add(
            metric,
            suffix,
            "AnyLatency",
            props.max_latency.num_milliseconds() as f64,
            format!("{latency_type} latency is too high."),
            disambiguator,
            &props.common,
        )
    }

    pub fn add_integration_latency_alarm(
        &self,
        metric: &MetricReference,
        latency_type: LatencyType,
        props: &LatencyThreshold,
        disambiguator: &str,
        additional_suffix: Option<&str>,
    ) -> Result<AlarmDefinition> {
        let suffix = join_suffix(&["IntegrationLatency", latency_type.as_str()], additional_suffix);
        self.add(
            metric,
            suffix,
            "AnyLatency",
            props.max_latency.num_milliseconds() as f64,
            format!("{latency_type} integration latency is too high."),
            disambiguator,
            &props.common,
        )
    }

    pub fn add_duration_alarm(
        &self,
        metric: &MetricReference,
        latency_type: LatencyType,
        props: &DurationThreshold,
        disambiguator: &str,
        additional_suffix: Option<&str>,
    ) -> Result<AlarmDefinition> {
        let suffix = join_suffix(&["Duration", latency_type.as_str()], additional_suffix);
        self.add(
            metric,
            suffix,
            "AnyDuration",
            props.max_duration.num_milliseconds() as f64,
            format!("{latency_type} duration is too long."),
            disambiguator,
            &props.common,
        )
    }

    pub fn add_jvm_garbage_collection_duration_alarm(
        &self,
        metric: &MetricReference,
        latency_type: LatencyType,
        props: &DurationThreshold,
        disambiguator: &str,
        additional_suffix: Option<&str>,
    ) -> Result<AlarmDefinition> {
        let suffix = join_suffix(
            &["Garbage-Collection-Time", latency_type.as_str()],
            additional_suffix,
        );
        self.add(
            metric,
            suffix,
            "AnyDuration",
            props.max_duration.num_milliseconds() as f64,
            format!("{latency_type} duration is too long."),
            disambiguator,
            &props.common,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn add(
        &self,
        metric: &MetricReference,
        suffix: String,
        default_dedupe: &str,
        threshold_ms: f64,
        description: String,
        disambiguator: &str,
        common: &CustomAlarmThreshold,
    ) -> Result<AlarmDefinition> {
        let dedupe = if self.alarm_factory.should_use_default_dedupe_for_latency() {
            default_dedupe.to_string()
        } else {
            suffix.clone()
        };
        let props = AddAlarmProps::new(
            suffix,
            ComparisonOperator::GreaterThanThreshold,
            TreatMissingData::NotBreaching,
        )
        .with_threshold(threshold_ms)
        .with_disambiguator(disambiguator)
        .with_description(description)
        .with_dedupe_suffix(Some(dedupe))
        .with_common(common);
        self.alarm_factory.add_alarm(metric, props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_decimal_percentiles() {
        assert_eq!(LatencyType::P99.label(), "P99 (avg: ${AVG})");
        assert_eq!(LatencyType::P999.label(), "P99.9 (avg: ${AVG})");
        assert_eq!(LatencyType::Tm9999.label(), "TM99.99 (avg: ${AVG})");
        assert_eq!(LatencyType::Average.label(), "Average");
        assert_eq!(LatencyType::Max.label(), "Maximum");
    }

    #[test]
    fn expression_ids() {
        assert_eq!(LatencyType::P90.expression_id(), "90");
        assert_eq!(LatencyType::Average.expression_id(), "Avg");
        assert_eq!(LatencyType::Tm99.expression_id(), "TM99");
    }

    #[test]
    fn every_type_maps_to_a_statistic() {
        for latency_type in LatencyType::ALL {
            assert!(!latency_type.statistic().as_str().is_empty());
        }
        assert_eq!(LatencyType::Max.statistic(), Statistic::Maximum);
    }
}
