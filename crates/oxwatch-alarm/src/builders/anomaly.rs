use crate::comparison::{ComparisonOperator, TreatMissingData};
use crate::definition::AlarmDefinition;
use crate::factory::{AddAlarmProps, AlarmFactory};
use crate::threshold::AnomalyDetectionThreshold;
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_metric::MetricReference;

/// Alarms comparing a series against its anomaly-detection band.
///
/// The metric passed in must be the band built by
/// `MetricFactory::create_metric_anomaly_detection`.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyDetectingAlarmFactory<'a> {
    alarm_factory: &'a AlarmFactory,
}

impl<'a> AnomalyDetectingAlarmFactory<'a> {
    pub fn new(alarm_factory: &'a AlarmFactory) -> Self {
        Self { alarm_factory }
    }

    pub fn add_alarm_when_out_of_band(
        &self,
        band: &MetricReference,
        alarm_name_suffix: &str,
        disambiguator: &str,
        props: &AnomalyDetectionThreshold,
    ) -> Result<AlarmDefinition> {
        let (operator, default_description) = match (
            props.alarm_when_above_the_band,
            props.alarm_when_below_the_band,
        ) {
            (true, true) => (
                ComparisonOperator::LessThanLowerOrGreaterThanUpperThreshold,
                "Anomaly detection: value is outside of the expected band.",
            ),
            (true, false) => (
                ComparisonOperator::GreaterThanUpperThreshold,
                "Anomaly detection: value is above the expected band.",
            ),
            (false, true) => (
                ComparisonOperator::LessThanLowerThreshold,
                "Anomaly detection: value is below the expected band.",
            ),
            (false, false) => {
                return Err(MonitoringError::AnomalyBandSideMissing {
                    disambiguator: disambiguator.to_string(),
                })
            }
        };
        let description = props
            .additional_description
            .as_deref()
            .unwrap_or(default_description);

        let mut common = props.common.clone();
        // the band sides decide the operator
        common.comparison_operator_override = None;
        let props = AddAlarmProps::new(alarm_name_suffix, operator, TreatMissingData::Missing)
            .with_description(description)
            .with_dedupe_suffix(common.dedupe_string_override.clone())
            .with_disambiguator(disambiguator)
            .with_common(&common);
        self.alarm_factory.add_alarm(band, props)
    }
}
